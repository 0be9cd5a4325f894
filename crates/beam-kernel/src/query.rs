//! Read-only beam queries.
//!
//! Views never carry the claim secret, in any mode. JSON output is
//! pretty-printed with two-space indentation. Amounts render as decimal
//! strings, since many JSON clients cannot hold a full `u64`.

use beam_kernel_core::{parse_beam_id, Actor, Amount, Beam, BeamId, BeamStatus};
use beam_kernel_store::KvStore;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::repository::BeamRepository;

/// Public projection of a beam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamView {
    pub id: BeamId,
    pub creator: Actor,
    #[serde(with = "amount_string")]
    pub amount: Amount,
    pub status: BeamStatus,
}

mod amount_string {
    use beam_kernel_core::Amount;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map(Amount).map_err(D::Error::custom)
    }
}

impl From<&Beam> for BeamView {
    fn from(beam: &Beam) -> Self {
        Self {
            id: beam.id.clone(),
            creator: beam.creator.clone(),
            amount: beam.amount,
            status: beam.status,
        }
    }
}

/// One page of beam views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPage {
    pub beams: Vec<BeamView>,
    pub next: Option<BeamId>,
}

/// Query service over the beam namespace. Never writes.
#[derive(Debug, Clone)]
pub struct QueryService<S> {
    repo: BeamRepository<S>,
}

impl<S: KvStore> QueryService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: BeamRepository::new(store),
        }
    }

    /// Every beam, in id order.
    pub async fn list_all(&self) -> Result<Vec<BeamView>> {
        Ok(self.repo.list().await?.iter().map(BeamView::from).collect())
    }

    /// One beam. Fails with `NotFound` when absent.
    pub async fn get_one(&self, id: &BeamId) -> Result<BeamView> {
        Ok(BeamView::from(&self.repo.get(id).await?))
    }

    /// A page of beams after `after`. `limit` must lie in `1..=MAX_PAGE_SIZE`.
    pub async fn list_page(&self, after: Option<&BeamId>, limit: usize) -> Result<ViewPage> {
        let page = self.repo.list_page(after, limit).await?;
        Ok(ViewPage {
            beams: page.beams.iter().map(BeamView::from).collect(),
            next: page.next,
        })
    }

    /// [`list_all`](Self::list_all) rendered as JSON.
    pub async fn list_all_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.list_all().await?)?)
    }

    /// [`get_one`](Self::get_one) for an untrusted id, rendered as JSON.
    pub async fn get_one_json(&self, raw_id: &str) -> Result<Vec<u8>> {
        let id = parse_beam_id(raw_id)?;
        Ok(serde_json::to_vec_pretty(&self.get_one(&id).await?)?)
    }

    /// [`list_page`](Self::list_page) for an untrusted cursor, rendered as JSON.
    pub async fn list_page_json(&self, after: Option<&str>, limit: usize) -> Result<Vec<u8>> {
        let after = after.map(parse_beam_id).transpose()?;
        Ok(serde_json::to_vec_pretty(
            &self.list_page(after.as_ref(), limit).await?,
        )?)
    }
}
