//! End-to-end lifecycle behaviour over the in-memory backend.

use beam_kernel::transfer::memory::{InMemoryLedger, TransferRecord};
use beam_kernel::{
    Account, Amount, BeamId, BeamMsg, BeamStatus, CancelBeam, ClaimBeam, CloseBeam,
    IncreaseBeam, KernelConfig, KernelError, MsgOutcome, OpenBeam, TransferError,
};
use beam_kernel_testkit::fixtures::{alice, bob, carol, KernelFixture, SequenceIds};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn scenario_open_increase_close() {
    let fx = KernelFixture::new();
    let id = fx.open_beam(alice(), "s1", 100).await;

    let beam = fx.beam(&id).await;
    assert_eq!(beam.status, BeamStatus::Pending);
    assert_eq!(beam.amount, Amount(100));

    fx.kernel
        .increase(IncreaseBeam {
            id: id.clone(),
            updater: alice(),
            amount: Amount(50),
        })
        .await
        .unwrap();
    assert_eq!(fx.beam(&id).await.amount, Amount(150));

    fx.kernel
        .close(CloseBeam {
            id: id.clone(),
            updater: alice(),
        })
        .await
        .unwrap();
    assert_eq!(fx.beam(&id).await.status, BeamStatus::Finalized);

    let transfers = fx.ledger.transfers().await;
    assert_eq!(
        transfers,
        vec![TransferRecord {
            from: Account::Escrow,
            to: Account::Actor(alice()),
            amount: Amount(150),
        }]
    );
}

#[tokio::test]
async fn scenario_claim_with_wrong_then_right_secret() {
    let fx = KernelFixture::new();
    let id = fx.open_beam(bob(), "s2", 10).await;

    let err = fx
        .kernel
        .claim(ClaimBeam {
            id: id.clone(),
            secret: "wrong".into(),
            claimer: carol(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, KernelError::NotAuthorized { .. }));
    assert_eq!(fx.beam(&id).await.status, BeamStatus::Pending);
    assert!(fx.ledger.transfers().await.is_empty());

    fx.kernel
        .claim(ClaimBeam {
            id: id.clone(),
            secret: "s2".into(),
            claimer: carol(),
        })
        .await
        .unwrap();
    assert_eq!(fx.beam(&id).await.status, BeamStatus::Claimed);
    assert_eq!(fx.ledger.balance(&Account::Actor(carol())).await, 10);
}

#[tokio::test]
async fn scenario_cancel_then_increase_is_rejected() {
    let fx = KernelFixture::new();
    let id = fx.open_beam(alice(), "s3", 20).await;

    fx.kernel
        .cancel(CancelBeam {
            id: id.clone(),
            updater: alice(),
        })
        .await
        .unwrap();
    assert_eq!(fx.beam(&id).await.status, BeamStatus::Canceled);

    let err = fx
        .kernel
        .increase(IncreaseBeam {
            id: id.clone(),
            updater: alice(),
            amount: Amount(5),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        KernelError::InvalidState {
            status: BeamStatus::Canceled,
            ..
        }
    ));
    assert_eq!(fx.beam(&id).await.amount, Amount(20));
}

#[tokio::test]
async fn terminal_beams_reject_every_operation() {
    let fx = KernelFixture::new();
    let id = fx.open_beam(alice(), "s", 1).await;
    fx.kernel
        .claim(ClaimBeam {
            id: id.clone(),
            secret: "s".into(),
            claimer: bob(),
        })
        .await
        .unwrap();

    let attempts: Vec<BeamMsg> = vec![
        IncreaseBeam {
            id: id.clone(),
            updater: alice(),
            amount: Amount(1),
        }
        .into(),
        CloseBeam {
            id: id.clone(),
            updater: alice(),
        }
        .into(),
        CancelBeam {
            id: id.clone(),
            updater: alice(),
        }
        .into(),
        ClaimBeam {
            id: id.clone(),
            secret: "s".into(),
            claimer: carol(),
        }
        .into(),
    ];

    for msg in attempts {
        let err = fx.kernel.handle(msg).await.unwrap_err();
        assert!(matches!(err, KernelError::InvalidState { .. }), "{err}");
    }

    let beam = fx.beam(&id).await;
    assert_eq!(beam.status, BeamStatus::Claimed);
    assert_eq!(beam.amount, Amount(1));
    assert_eq!(fx.ledger.transfers().await.len(), 1);
}

#[tokio::test]
async fn only_the_creator_may_update() {
    let fx = KernelFixture::new();
    let id = fx.open_beam(alice(), "s", 5).await;

    let increase = fx
        .kernel
        .increase(IncreaseBeam {
            id: id.clone(),
            updater: bob(),
            amount: Amount(1),
        })
        .await;
    let close = fx
        .kernel
        .close(CloseBeam {
            id: id.clone(),
            updater: bob(),
        })
        .await;
    let cancel = fx
        .kernel
        .cancel(CancelBeam {
            id: id.clone(),
            updater: bob(),
        })
        .await;

    for result in [increase, close, cancel] {
        assert!(matches!(result, Err(KernelError::NotAuthorized { .. })));
    }
    let beam = fx.beam(&id).await;
    assert!(beam.is_pending());
    assert_eq!(beam.amount, Amount(5));
}

#[tokio::test]
async fn operations_on_missing_beams_write_nothing() {
    let fx = KernelFixture::new();
    let missing = BeamId::parse("missing123").unwrap();

    let err = fx
        .kernel
        .claim(ClaimBeam {
            id: missing.clone(),
            secret: "s".into(),
            claimer: bob(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, KernelError::NotFound(ref id) if *id == missing));

    let err = fx
        .kernel
        .increase(IncreaseBeam {
            id: missing,
            updater: alice(),
            amount: Amount(1),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, KernelError::NotFound(_)));
    assert!(fx.store.is_empty().unwrap());
}

#[tokio::test]
async fn open_retries_past_taken_ids() {
    let ids = SequenceIds::new(["aaaaaaaaaa", "aaaaaaaaaa", "bbbbbbbbbb"]);
    let calls = ids.calls();
    let fx = KernelFixture::with_ids(KernelConfig::default(), ids);

    let first = fx.open_beam(alice(), "s", 1).await;
    let second = fx.open_beam(bob(), "t", 2).await;

    assert_eq!(first.as_str(), "aaaaaaaaaa");
    assert_eq!(second.as_str(), "bbbbbbbbbb");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(fx.beam(&first).await.creator, alice());
}

#[tokio::test]
async fn open_gives_up_after_max_attempts() {
    let ids = SequenceIds::new(["takenid1"]);
    let calls = ids.calls();
    let config = KernelConfig {
        max_id_attempts: 4,
        ..Default::default()
    };
    let fx = KernelFixture::with_ids(config, ids);
    fx.open_beam(alice(), "s", 1).await;

    let err = fx
        .kernel
        .open(OpenBeam {
            creator: bob(),
            secret: "t".into(),
            amount: Amount(1),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, KernelError::ExhaustedIdentifierSpace { attempts: 4 }));
    assert_eq!(calls.load(Ordering::SeqCst), 1 + 4);
    assert_eq!(fx.store.len().unwrap(), 1);
}

#[tokio::test]
async fn strict_ledger_failure_keeps_beam_retryable() {
    let fx = KernelFixture::with_ledger(InMemoryLedger::strict());
    let id = fx.open_beam(alice(), "s", 30).await;

    let err = fx
        .kernel
        .close(CloseBeam {
            id: id.clone(),
            updater: alice(),
        })
        .await
        .unwrap_err();
    match err {
        KernelError::TransferFailed {
            source: TransferError::InsufficientFunds { needed, .. },
            ..
        } => assert_eq!(needed, Amount(30)),
        other => panic!("expected TransferFailed, got {other:?}"),
    }
    assert!(fx.beam(&id).await.is_pending());

    fx.ledger.credit(Account::Escrow, Amount(30)).await;
    fx.kernel
        .close(CloseBeam {
            id: id.clone(),
            updater: alice(),
        })
        .await
        .unwrap();
    assert_eq!(fx.beam(&id).await.status, BeamStatus::Finalized);
    assert_eq!(fx.ledger.balance(&Account::Escrow).await, 0);
}

#[tokio::test]
async fn handle_reports_outcomes() {
    let fx = KernelFixture::new();
    let opened = fx
        .kernel
        .handle(
            OpenBeam {
                creator: alice(),
                secret: "s".into(),
                amount: Amount(9),
            }
            .into(),
        )
        .await
        .unwrap();
    let MsgOutcome::Opened(id) = opened else {
        panic!("expected Opened, got {opened:?}");
    };

    let cancelled = fx
        .kernel
        .handle(
            CancelBeam {
                id: id.clone(),
                updater: alice(),
            }
            .into(),
        )
        .await
        .unwrap();
    assert_eq!(cancelled, MsgOutcome::Updated(id));
}

#[tokio::test]
async fn plaintext_mode_still_hides_secret_from_queries() {
    let fx = KernelFixture::with_config(KernelConfig {
        secret_mode: beam_kernel::SecretMode::Plaintext,
        ..Default::default()
    });
    let id = fx.open_beam(alice(), "correct horse", 3).await;

    let json = fx.kernel.query().get_one_json(id.as_str()).await.unwrap();
    let text = String::from_utf8(json).unwrap();
    assert!(!text.contains("correct horse"));
    assert!(text.contains(&format!("\"id\": \"{}\"", id)));
}
