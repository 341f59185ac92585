//! Concurrency behavior of certificate provisioning.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use pdf_signet::certificate::{
    AuthorityIdentity, CertificateAuthority, CertificateRecord, CertificateRepository,
    CertificateStore, InMemoryCertificateRepository,
};
use pdf_signet::crypto::MasterKey;
use pdf_signet::{Error, Result};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn store_over(repo: Arc<InMemoryCertificateRepository>) -> CertificateStore {
    CertificateStore::new(
        repo,
        CertificateAuthority::new(AuthorityIdentity::default(), "bundle-pass"),
        MasterKey::from_bytes([3u8; 32]),
        "staging",
    )
}

#[test]
fn test_concurrent_cold_start_provisions_exactly_once() {
    init_logging();
    let repo = Arc::new(InMemoryCertificateRepository::new());
    let store = Arc::new(store_over(Arc::clone(&repo)));

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.get_or_create().map(|c| c.record.serial_number.clone())
            })
        })
        .collect();

    let serials: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();

    // Every caller got the same certificate and only one row was persisted.
    assert!(serials.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(repo.rows().len(), 1);
    assert!(repo.rows()[0].is_active);
}

#[test]
fn test_two_stores_same_repository_share_the_row() {
    let repo = Arc::new(InMemoryCertificateRepository::new());
    let a = store_over(Arc::clone(&repo));
    let b = store_over(Arc::clone(&repo));

    let first = a.get_or_create().unwrap();
    let second = b.get_or_create().unwrap();

    // The second store finds the persisted row instead of generating.
    assert_eq!(first.record.serial_number, second.record.serial_number);
    assert_eq!(repo.rows().len(), 1);
}

#[test]
fn test_renewal_is_visible_after_cache_clear() {
    let repo = Arc::new(InMemoryCertificateRepository::new());
    let signer = store_over(Arc::clone(&repo));
    let rotator = store_over(Arc::clone(&repo));

    let old = signer.get_or_create().unwrap();
    let renewed = rotator.renew().unwrap();
    assert_ne!(old.record.serial_number, renewed.record.serial_number);

    // The signer still serves its cached certificate until told otherwise.
    let cached = signer.get_or_create().unwrap();
    assert_eq!(cached.record.serial_number, old.record.serial_number);

    signer.clear_cache();
    let fresh = signer.get_or_create().unwrap();
    assert_eq!(fresh.record.serial_number, renewed.record.serial_number);
}

/// Repository whose first `insert` calls fail, for provisioning-failure tests.
struct FlakyRepository {
    inner: InMemoryCertificateRepository,
    insert_failures: AtomicUsize,
}

impl FlakyRepository {
    fn failing_once() -> Self {
        Self {
            inner: InMemoryCertificateRepository::new(),
            insert_failures: AtomicUsize::new(1),
        }
    }
}

impl CertificateRepository for FlakyRepository {
    fn find_active(&self, environment: &str) -> Result<Option<CertificateRecord>> {
        self.inner.find_active(environment)
    }

    fn insert(&self, record: &CertificateRecord) -> Result<()> {
        let should_fail = self
            .insert_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            // Hold the flight open long enough for every waiter to park.
            thread::sleep(Duration::from_millis(200));
            return Err(Error::Repository("row store unavailable".to_string()));
        }
        self.inner.insert(record)
    }

    fn deactivate_all(&self, environment: &str) -> Result<()> {
        self.inner.deactivate_all(environment)
    }

    fn update_private_key(&self, serial_number: &str, private_key_pem: &str) -> Result<()> {
        self.inner.update_private_key(serial_number, private_key_pem)
    }
}

#[test]
fn test_failed_flight_surfaces_state_error_to_waiters() {
    init_logging();
    let repo = Arc::new(FlakyRepository::failing_once());
    let store = Arc::new(CertificateStore::new(
        repo.clone(),
        CertificateAuthority::new(AuthorityIdentity::default(), "bundle-pass"),
        MasterKey::from_bytes([3u8; 32]),
        "staging",
    ));

    let threads = 4;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.get_or_create()
            })
        })
        .collect();

    let mut repository_errors = 0;
    let mut state_errors = 0;
    for handle in handles {
        match handle.join().unwrap().unwrap_err() {
            // The flight leader sees the underlying storage failure.
            Error::Repository(_) => repository_errors += 1,
            // Every waiter gets the provisioning-failed state error.
            Error::CertificateState(_) => state_errors += 1,
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(repository_errors, 1);
    assert_eq!(state_errors, threads - 1);

    // The flight slot was released: a later call provisions normally.
    let cert = store.get_or_create().unwrap();
    assert!(cert.is_currently_valid());
    assert_eq!(repo.inner.rows().len(), 1);
}

#[test]
fn test_environments_do_not_share_certificates() {
    let repo = Arc::new(InMemoryCertificateRepository::new());
    let staging = store_over(Arc::clone(&repo));
    let production = CertificateStore::new(
        repo.clone(),
        CertificateAuthority::new(AuthorityIdentity::default(), "bundle-pass"),
        MasterKey::from_bytes([3u8; 32]),
        "production",
    );

    let s = staging.get_or_create().unwrap();
    let p = production.get_or_create().unwrap();
    assert_ne!(s.record.serial_number, p.record.serial_number);
    assert_eq!(s.record.environment, "staging");
    assert_eq!(p.record.environment, "production");
    assert_eq!(repo.rows().len(), 2);
}
