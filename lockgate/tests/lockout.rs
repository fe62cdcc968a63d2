use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use lockgate::{
    AdjustableClock, Lockgate, LockoutConfig, StaticCredentials, StaticDirectory,
};

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_000_000_000).unwrap()
}

fn wired_gate() -> (
    Arc<AdjustableClock>,
    Lockgate<AdjustableClock, StaticDirectory, StaticCredentials>,
) {
    let clock = Arc::new(AdjustableClock::new());
    clock.pin(t0());
    let credentials = Arc::new(StaticCredentials::new().with_account("admin", "admin"));
    let directory = Arc::new(StaticDirectory::new(credentials.identities()));
    let gate = Lockgate::new(
        clock.clone(),
        directory,
        credentials,
        LockoutConfig::default(),
    );
    (clock, gate)
}

#[test]
fn lockout_lifecycle_end_to_end() {
    let (clock, gate) = wired_gate();

    // Three wrong passwords exhaust the attempt budget.
    assert!(!gate.authenticate("admin", "wrong").is_granted());
    assert_eq!(gate.status("admin").remaining_attempts, 2);

    assert!(!gate.authenticate("admin", "wrong").is_granted());
    assert_eq!(gate.status("admin").remaining_attempts, 1);

    assert!(!gate.authenticate("admin", "wrong").is_granted());
    assert!(gate.is_locked_out("admin"));

    // Correct credentials are irrelevant while locked out.
    assert!(!gate.authenticate("admin", "admin").is_granted());

    // Once the window elapses the gate opens and valid credentials pass.
    clock.pin(t0() + Duration::minutes(5));
    assert!(gate.authenticate("admin", "admin").is_granted());
    assert!(!gate.is_locked_out("admin"));
}

#[test]
fn successful_login_does_not_consume_attempts() {
    let (_clock, gate) = wired_gate();

    for _ in 0..10 {
        assert!(gate.authenticate("admin", "admin").is_granted());
    }
    assert_eq!(gate.status("admin").remaining_attempts, 3);
}

#[test]
fn unknown_identities_never_lock() {
    let (_clock, gate) = wired_gate();

    for _ in 0..10 {
        assert!(!gate.authenticate("intruder", "admin").is_granted());
    }

    assert!(!gate.is_locked_out("intruder"));
    let status = gate.status("intruder");
    assert!(!status.known);
    assert!(!status.locked);
}

#[test]
fn identities_lock_independently() {
    let clock = Arc::new(AdjustableClock::new());
    clock.pin(t0());
    let credentials = Arc::new(
        StaticCredentials::new()
            .with_account("admin", "admin")
            .with_account("operator", "hunter2"),
    );
    let directory = Arc::new(StaticDirectory::new(credentials.identities()));
    let gate = Lockgate::new(clock, directory, credentials, LockoutConfig::default());

    for _ in 0..3 {
        gate.authenticate("admin", "wrong");
    }

    assert!(gate.is_locked_out("admin"));
    assert!(!gate.is_locked_out("operator"));
    assert!(gate.authenticate("operator", "hunter2").is_granted());
}
