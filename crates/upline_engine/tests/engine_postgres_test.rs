//! End-to-end engine tests against a real PostgreSQL database.
//!
//! Run with:
//!   DATABASE_URL=postgres://... cargo test -p upline_engine -- --ignored

use diesel::prelude::*;
use upline_core::{AffiliateEventType, LedgerAction, LedgerStatus, MIN_PAYOUT_CENTS};
use upline_database::schema::affiliate_profiles;
use upline_database::{NewAffiliateProfile, establish_connection, run_migrations};
use upline_engine::{
    BankInfo, BindOutcome, EventRequestBuilder, apply_ledger_action, available_payout_cents,
    bind_referral_if_eligible, create_payout_request, downline_tree, ensure_affiliate_enabled,
    record_affiliate_event,
};
use upline_error::{LedgerErrorKind, PayoutErrorKind};
use uuid::Uuid;

fn test_conn() -> PgConnection {
    dotenvy::dotenv().ok();
    let mut conn = establish_connection().expect("DATABASE_URL must point at a test database");
    run_migrations(&mut conn).expect("migrations apply");
    conn
}

fn insert_profile(
    conn: &mut PgConnection,
    id: Uuid,
    referred_by: Option<Uuid>,
    referral_path: Option<String>,
    enabled: bool,
) {
    let code = enabled.then(|| test_code());
    diesel::insert_into(affiliate_profiles::table)
        .values(&NewAffiliateProfile {
            id,
            referral_code: code,
            referred_by,
            referral_path,
            is_affiliate_enabled: enabled,
            affiliate_enabled_at: None,
        })
        .execute(conn)
        .expect("insert profile");
}

fn test_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

fn event_request(buyer: Uuid, amount: i64) -> upline_engine::EventRequest {
    EventRequestBuilder::default()
        .buyer_id(buyer)
        .event_type(AffiliateEventType::PackagePurchase)
        .amount_cents(amount)
        .external_ref(format!("test:{}", Uuid::new_v4()))
        .build()
        .expect("request builds")
}

/// Upline chain root -> l2 -> l1 -> buyer, all enabled.
fn seed_chain(conn: &mut PgConnection) -> (Uuid, Uuid, Uuid, Uuid) {
    let l3 = Uuid::new_v4();
    let l2 = Uuid::new_v4();
    let l1 = Uuid::new_v4();
    let buyer = Uuid::new_v4();
    insert_profile(conn, l3, None, None, true);
    insert_profile(conn, l2, Some(l3), Some(l3.to_string()), true);
    insert_profile(conn, l1, Some(l2), Some(format!("{}>{}", l2, l3)), true);
    insert_profile(
        conn,
        buyer,
        Some(l1),
        Some(format!("{}>{}>{}", l1, l2, l3)),
        false,
    );
    (buyer, l1, l2, l3)
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn event_creation_is_idempotent() {
    let mut conn = test_conn();
    let (buyer, ..) = seed_chain(&mut conn);

    let request = event_request(buyer, 10_000);
    let first = record_affiliate_event(&mut conn, &request).expect("first call");
    let second = record_affiliate_event(&mut conn, &request).expect("second call");

    assert!(*first.created());
    assert!(!*second.created());
    assert_eq!(first.event_id(), second.event_id());
    assert_eq!(first.ledger_entry_ids().len(), 3);
    assert!(second.ledger_entry_ids().is_empty());

    use upline_database::schema::commission_ledger;
    let rows: i64 = commission_ledger::table
        .filter(commission_ledger::event_id.eq(first.event_id()))
        .count()
        .get_result(&mut conn)
        .expect("count");
    assert_eq!(rows, 3);
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn commission_amounts_conserve_the_rate_table() {
    let mut conn = test_conn();
    let (buyer, l1, l2, l3) = seed_chain(&mut conn);

    let recorded = record_affiliate_event(&mut conn, &event_request(buyer, 10_000))
        .expect("record");

    use upline_database::schema::commission_ledger;
    let rows: Vec<(Uuid, i32, i64, String)> = commission_ledger::table
        .filter(commission_ledger::event_id.eq(recorded.event_id()))
        .order(commission_ledger::level.asc())
        .select((
            commission_ledger::earner_id,
            commission_ledger::level,
            commission_ledger::amount_cents,
            commission_ledger::status,
        ))
        .load(&mut conn)
        .expect("load ledger");

    assert_eq!(
        rows,
        vec![
            (l1, 1, 2_500, "PENDING".to_string()),
            (l2, 2, 500, "PENDING".to_string()),
            (l3, 3, 300, "PENDING".to_string()),
        ]
    );
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn disabled_upline_member_earns_nothing() {
    let mut conn = test_conn();
    let (buyer, _l1, l2, _l3) = seed_chain(&mut conn);

    diesel::update(affiliate_profiles::table.find(l2))
        .set(affiliate_profiles::is_affiliate_enabled.eq(false))
        .execute(&mut conn)
        .expect("disable l2");

    let recorded = record_affiliate_event(&mut conn, &event_request(buyer, 10_000))
        .expect("record");

    use upline_database::schema::commission_ledger;
    let levels: Vec<i32> = commission_ledger::table
        .filter(commission_ledger::event_id.eq(recorded.event_id()))
        .order(commission_ledger::level.asc())
        .select(commission_ledger::level)
        .load(&mut conn)
        .expect("load levels");
    assert_eq!(levels, vec![1, 3]);
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn first_referrer_wins_and_rebinding_is_a_noop() {
    let mut conn = test_conn();
    let referrer_a = Uuid::new_v4();
    let referrer_b = Uuid::new_v4();
    let buyer = Uuid::new_v4();
    insert_profile(&mut conn, referrer_a, None, None, true);
    insert_profile(&mut conn, referrer_b, None, None, true);
    insert_profile(&mut conn, buyer, None, None, false);

    let code_a = ensure_affiliate_enabled(&mut conn, referrer_a)
        .expect("enable a")
        .referral_code
        .expect("code a");
    let code_b = ensure_affiliate_enabled(&mut conn, referrer_b)
        .expect("enable b")
        .referral_code
        .expect("code b");

    let first = bind_referral_if_eligible(&mut conn, buyer, &code_a).expect("bind a");
    assert!(matches!(first, BindOutcome::Bound { referrer_id, .. } if referrer_id == referrer_a));

    let second = bind_referral_if_eligible(&mut conn, buyer, &code_b).expect("bind b");
    assert_eq!(
        second,
        BindOutcome::AlreadyBound {
            referred_by: referrer_a
        }
    );
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn self_referral_never_mutates() {
    let mut conn = test_conn();
    let member = Uuid::new_v4();
    insert_profile(&mut conn, member, None, None, true);
    let code = ensure_affiliate_enabled(&mut conn, member)
        .expect("enable")
        .referral_code
        .expect("code");

    let outcome = bind_referral_if_eligible(&mut conn, member, &code).expect("bind");
    assert_eq!(outcome, BindOutcome::SelfReferral);

    let referred_by: Option<Uuid> = affiliate_profiles::table
        .find(member)
        .select(affiliate_profiles::referred_by)
        .first(&mut conn)
        .expect("load");
    assert_eq!(referred_by, None);
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn enablement_is_idempotent_and_timestamp_sticky() {
    let mut conn = test_conn();
    let member = Uuid::new_v4();
    insert_profile(&mut conn, member, None, None, false);

    let first = ensure_affiliate_enabled(&mut conn, member).expect("first enable");
    let second = ensure_affiliate_enabled(&mut conn, member).expect("second enable");

    assert!(second.is_affiliate_enabled);
    assert_eq!(first.referral_code, second.referral_code);
    assert_eq!(first.affiliate_enabled_at, second.affiliate_enabled_at);
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn mixed_status_batches_are_rejected_whole() {
    let mut conn = test_conn();
    let (buyer, ..) = seed_chain(&mut conn);
    let recorded = record_affiliate_event(&mut conn, &event_request(buyer, 10_000))
        .expect("record");
    let ids = recorded.ledger_entry_ids().clone();

    // Approve one entry so the selection mixes PENDING and APPROVED.
    apply_ledger_action(&mut conn, &ids[..1], LedgerAction::Approve, "admin", None)
        .expect("approve one");

    let err = apply_ledger_action(&mut conn, &ids, LedgerAction::Approve, "admin", None)
        .expect_err("mixed batch must fail");
    assert!(matches!(err.kind, LedgerErrorKind::MixedBatch));

    // The PENDING entries were not touched.
    use upline_database::schema::commission_ledger;
    let pending: i64 = commission_ledger::table
        .filter(commission_ledger::id.eq_any(&ids))
        .filter(commission_ledger::status.eq(LedgerStatus::Pending.to_string()))
        .count()
        .get_result(&mut conn)
        .expect("count pending");
    assert_eq!(pending, 2);
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn ledger_transition_legality() {
    let mut conn = test_conn();
    let (buyer, ..) = seed_chain(&mut conn);
    let recorded = record_affiliate_event(&mut conn, &event_request(buyer, 10_000))
        .expect("record");
    let ids = recorded.ledger_entry_ids().clone();

    // mark_paid from PENDING is illegal.
    let err = apply_ledger_action(&mut conn, &ids, LedgerAction::MarkPaid, "admin", None)
        .expect_err("mark_paid from PENDING");
    assert!(matches!(err.kind, LedgerErrorKind::InvalidTransition(_)));

    apply_ledger_action(&mut conn, &ids, LedgerAction::Approve, "admin", None).expect("approve");
    apply_ledger_action(&mut conn, &ids, LedgerAction::MarkPaid, "admin", None).expect("pay");

    // approve on PAID is illegal, reverse from PAID is legal.
    let err = apply_ledger_action(&mut conn, &ids, LedgerAction::Approve, "admin", None)
        .expect_err("approve from PAID");
    assert!(matches!(err.kind, LedgerErrorKind::InvalidTransition(_)));

    apply_ledger_action(
        &mut conn,
        &ids,
        LedgerAction::Reverse,
        "admin",
        Some("clawback"),
    )
    .expect("reverse paid");

    let err = apply_ledger_action(&mut conn, &ids, LedgerAction::Reverse, "admin", None)
        .expect_err("reverse twice");
    assert!(matches!(err.kind, LedgerErrorKind::InvalidTransition(_)));
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn payout_request_reserves_balance_immediately() {
    let mut conn = test_conn();
    let (buyer, l1, ..) = seed_chain(&mut conn);
    let recorded = record_affiliate_event(&mut conn, &event_request(buyer, 100_000))
        .expect("record");
    // Approve l1's 25_000-cent entry.
    apply_ledger_action(
        &mut conn,
        &recorded.ledger_entry_ids()[..1],
        LedgerAction::Approve,
        "admin",
        None,
    )
    .expect("approve");

    let before = available_payout_cents(&mut conn, l1).expect("balance before");
    assert_eq!(before, 25_000);

    let bank = BankInfo::new(
        "Test Bank".to_string(),
        "Earner One".to_string(),
        "000123".to_string(),
    );
    create_payout_request(&mut conn, l1, MIN_PAYOUT_CENTS, &bank).expect("request");

    let after = available_payout_cents(&mut conn, l1).expect("balance after");
    assert_eq!(after, before - MIN_PAYOUT_CENTS);

    // A second overlapping request beyond the remainder is rejected.
    let err = create_payout_request(&mut conn, l1, after + 1, &bank)
        .expect_err("over-balance request");
    assert!(matches!(
        err.kind,
        PayoutErrorKind::InsufficientBalance { .. }
    ));
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn downline_tree_classifies_levels() {
    let mut conn = test_conn();
    let (buyer, l1, l2, l3) = seed_chain(&mut conn);

    let tree = downline_tree(&mut conn, l3).expect("tree for l3");
    let level_of = |id: Uuid| {
        tree.iter()
            .find(|m| *m.member_id() == id)
            .map(|m| *m.level())
    };
    assert_eq!(level_of(l2), Some(1));
    assert_eq!(level_of(l1), Some(2));
    assert_eq!(level_of(buyer), Some(3));

    // A root absent from every path sees an empty tree.
    let stranger = Uuid::new_v4();
    insert_profile(&mut conn, stranger, None, None, false);
    let empty = downline_tree(&mut conn, stranger).expect("tree for stranger");
    assert!(empty.is_empty());
}
