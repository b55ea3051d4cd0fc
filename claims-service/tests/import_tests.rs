//! End-to-end import tests against a live Postgres.
//!
//! Set `DATABASE_URL` to run them; without it every test returns early.

use std::io::Write;

use claims_service::{
    parse_claims, parse_details, ClaimImporter, ClaimService, ImportMode, ImportOptions,
};
use database_layer::{DatabasePool, PoolOptions};
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::NamedTempFile;

const HEADER: &str = "id|patient_name|billed_amount|paid_amount|status|insurer_name|discharge_date";

async fn test_pool() -> Option<DatabasePool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = DatabasePool::new(&url, &PoolOptions::default())
        .await
        .expect("connect to test database");
    pool.migrate().await.expect("run migrations");
    Some(pool)
}

async fn clear_range(pool: &DatabasePool, from: i32, to: i32) {
    sqlx::query("DELETE FROM claims WHERE id BETWEEN $1 AND $2")
        .bind(from)
        .bind(to)
        .execute(pool.pool())
        .await
        .expect("clear claim range");
}

fn claim_line(id: i32, paid: &str, status: &str) -> String {
    format!("{id}|Jane Roe|1000.00|{paid}|{status}|Aetna|2023-02-14")
}

fn claims_csv(lines: &[String]) -> String {
    let mut csv = String::from(HEADER);
    for line in lines {
        csv.push('\n');
        csv.push_str(line);
    }
    csv.push('\n');
    csv
}

fn options(mode: ImportMode, dry_run: bool) -> ImportOptions {
    ImportOptions { mode, dry_run }
}

#[tokio::test]
async fn test_smart_reimport_keeps_annotations() {
    let Some(pool) = test_pool().await else { return };
    clear_range(&pool, 920_000, 920_099).await;

    let importer = ClaimImporter::new(pool.clone());
    let claims = parse_claims(
        claims_csv(&[claim_line(920_001, "800.00", "Pending")]).as_bytes(),
        "claims.csv",
    )
    .unwrap();
    let details = parse_details("1|920001|N/A|99213\n".as_bytes(), "details.csv").unwrap();
    let summary = importer
        .import(claims, details, options(ImportMode::Smart, false))
        .await
        .unwrap();
    assert_eq!(summary.claims.created, 1);
    assert_eq!(summary.details.created, 1);

    let service = ClaimService::new(&pool);
    service.flag_claim(920_001, Some("auditor")).await.unwrap();
    service.add_note(920_001, "Appeal filed", None).await.unwrap();

    let claims = parse_claims(
        claims_csv(&[claim_line(920_001, "950.00", "Underpaid")]).as_bytes(),
        "claims.csv",
    )
    .unwrap();
    let details =
        parse_details("1|920001|Coding error|99213,99214\n".as_bytes(), "details.csv").unwrap();
    let summary = importer
        .import(claims, details, options(ImportMode::Smart, false))
        .await
        .unwrap();
    assert_eq!(summary.claims.updated, 1);
    assert_eq!(summary.details.updated, 1);

    let view = service.get_claim(920_001).await.unwrap();
    assert_eq!(view.claim.status, "Underpaid");
    assert_eq!(view.underpayment, Decimal::from_str("50.00").unwrap());
    assert_eq!(view.flags.len(), 1);
    assert_eq!(view.notes.len(), 1);
    let detail = view.detail.expect("detail kept");
    assert_eq!(detail.cpt_code_list, vec!["99213", "99214"]);

    clear_range(&pool, 920_000, 920_099).await;
}

#[tokio::test]
async fn test_overwrite_drops_annotations() {
    let Some(pool) = test_pool().await else { return };
    clear_range(&pool, 920_100, 920_199).await;

    let importer = ClaimImporter::new(pool.clone());
    let csv = claims_csv(&[claim_line(920_101, "800.00", "Pending")]);
    importer
        .import(
            parse_claims(csv.as_bytes(), "claims.csv").unwrap(),
            parse_details("1|920101|N/A|99213\n".as_bytes(), "details.csv").unwrap(),
            options(ImportMode::Smart, false),
        )
        .await
        .unwrap();

    let service = ClaimService::new(&pool);
    service.flag_claim(920_101, None).await.unwrap();

    let summary = importer
        .import(
            parse_claims(csv.as_bytes(), "claims.csv").unwrap(),
            parse_details("1|920101|N/A|99213\n".as_bytes(), "details.csv").unwrap(),
            options(ImportMode::Overwrite, false),
        )
        .await
        .unwrap();
    assert_eq!(summary.claims.replaced, 1);
    assert_eq!(summary.details.created, 1);

    let view = service.get_claim(920_101).await.unwrap();
    assert!(view.flags.is_empty());
    assert!(view.detail.is_some());

    clear_range(&pool, 920_100, 920_199).await;
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let Some(pool) = test_pool().await else { return };
    clear_range(&pool, 920_200, 920_299).await;

    let mut claims_file = NamedTempFile::new().unwrap();
    claims_file
        .write_all(claims_csv(&[claim_line(920_201, "10.00", "Denied")]).as_bytes())
        .unwrap();
    let mut details_file = NamedTempFile::new().unwrap();
    details_file.write_all(b"1|920201|N/A|99213\n").unwrap();

    let importer = ClaimImporter::new(pool.clone());
    let summary = importer
        .import_files(
            claims_file.path(),
            details_file.path(),
            options(ImportMode::Smart, true),
        )
        .await
        .unwrap();
    assert!(summary.dry_run);
    assert_eq!(summary.claims.created, 1);
    assert_eq!(summary.details.created, 1);

    let service = ClaimService::new(&pool);
    assert!(service.get_claim(920_201).await.is_err());

    clear_range(&pool, 920_200, 920_299).await;
}

#[tokio::test]
async fn test_append_skips_existing_claims() {
    let Some(pool) = test_pool().await else { return };
    clear_range(&pool, 920_300, 920_399).await;

    let importer = ClaimImporter::new(pool.clone());
    let first = claims_csv(&[claim_line(920_301, "100.00", "Pending")]);
    importer
        .import(
            parse_claims(first.as_bytes(), "claims.csv").unwrap(),
            Default::default(),
            options(ImportMode::Smart, false),
        )
        .await
        .unwrap();

    let second = claims_csv(&[
        claim_line(920_301, "999.00", "Paid"),
        claim_line(920_302, "100.00", "Pending"),
    ]);
    let service = ClaimService::new(&pool);
    service.flag_claim(920_301, Some("auditor")).await.unwrap();
    service.add_note(920_301, "Waiting on remittance", None).await.unwrap();

    let summary = importer
        .import(
            parse_claims(second.as_bytes(), "claims.csv").unwrap(),
            Default::default(),
            options(ImportMode::Append, false),
        )
        .await
        .unwrap();
    assert_eq!(summary.claims.total, 2);
    assert_eq!(summary.claims.skipped, 1);
    assert_eq!(summary.claims.created, 1);

    let view = service.get_claim(920_301).await.unwrap();
    assert_eq!(view.claim.status, "Pending");
    assert_eq!(view.flags.len(), 1);
    assert_eq!(view.notes.len(), 1);
    assert_eq!(view.notes[0].text, "Waiting on remittance");

    clear_range(&pool, 920_300, 920_399).await;
}

#[tokio::test]
async fn test_failed_import_rolls_back_everything() {
    let Some(pool) = test_pool().await else { return };
    clear_range(&pool, 920_400, 920_499).await;

    let importer = ClaimImporter::new(pool.clone());
    let seed = claims_csv(&[claim_line(920_401, "800.00", "Pending")]);
    importer
        .import(
            parse_claims(seed.as_bytes(), "claims.csv").unwrap(),
            parse_details("1|920401|N/A|99213\n".as_bytes(), "details.csv").unwrap(),
            options(ImportMode::Smart, false),
        )
        .await
        .unwrap();

    let service = ClaimService::new(&pool);
    service.flag_claim(920_401, Some("auditor")).await.unwrap();
    service.add_note(920_401, "Appeal filed", None).await.unwrap();

    // status is VARCHAR(50); the third row fails after the first two applied
    let too_long = "S".repeat(60);
    let batch = claims_csv(&[
        claim_line(920_401, "950.00", "Paid"),
        claim_line(920_402, "100.00", "Pending"),
        claim_line(920_403, "100.00", &too_long),
    ]);
    for mode in [ImportMode::Overwrite, ImportMode::Smart] {
        let result = importer
            .import(
                parse_claims(batch.as_bytes(), "claims.csv").unwrap(),
                Default::default(),
                options(mode, false),
            )
            .await;
        assert!(result.is_err(), "{mode} import should fail");

        let view = service.get_claim(920_401).await.unwrap();
        assert_eq!(view.claim.status, "Pending");
        assert_eq!(view.flags.len(), 1);
        assert_eq!(view.notes.len(), 1);
        assert!(view.detail.is_some());
        assert!(service.get_claim(920_402).await.is_err());
        assert!(service.get_claim(920_403).await.is_err());
    }

    clear_range(&pool, 920_400, 920_499).await;
}
