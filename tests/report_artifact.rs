use regional_jobs_monitor::eligibility::Postcode;
use regional_jobs_monitor::listings::{ListingItem, PoaResult};
use regional_jobs_monitor::report::{
    write_artifact, write_artifact_or_fallback, write_counts_csv, JobsArtifact,
};

fn sample_artifact() -> JobsArtifact {
    let mut artifact = JobsArtifact::empty(10, "Workforce Australia (replayed)");
    artifact.insert(
        Postcode::parse("0870").expect("valid postcode"),
        PoaResult {
            count: 1,
            items: vec![ListingItem {
                title: "Housekeeping Attendant".to_string(),
                company: "Desert Palms Resort".to_string(),
                location: "Alice Springs NT 0870".to_string(),
                age: "Added 3 days ago".to_string(),
                url: "https://example.test/jobs/1".to_string(),
            }],
        },
    );
    artifact.insert(
        Postcode::parse("2450").expect("valid postcode"),
        PoaResult::empty(),
    );
    artifact
}

#[test]
fn artifact_serialises_with_published_key_spellings() {
    let value = serde_json::to_value(sample_artifact()).expect("artifact serialises");
    let object = value.as_object().expect("artifact is an object");
    for key in ["generatedAtUTC", "windowDays", "source", "perPOA"] {
        assert!(object.contains_key(key), "missing key {key}");
    }
    assert_eq!(value["perPOA"]["0870"]["count"], 1);
    assert_eq!(value["perPOA"]["0870"]["items"][0]["age"], "Added 3 days ago");
    assert_eq!(value["perPOA"]["2450"]["count"], 0);
}

#[test]
fn write_and_load_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("data").join("jobs-last10d.json");

    let artifact = sample_artifact();
    write_artifact(&path, &artifact).expect("artifact writes");

    let loaded = JobsArtifact::load(&path).expect("artifact loads");
    assert_eq!(loaded, artifact);
    assert_eq!(loaded.total_jobs(), 1);
}

#[test]
fn fallback_write_surfaces_the_original_failure() {
    let dir = tempfile::tempdir().expect("temp dir");
    // Parent path is a file, so neither the artifact nor the fallback can
    // be written.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").expect("blocker written");
    let path = blocker.join("jobs-last10d.json");

    let err = write_artifact_or_fallback(&path, &sample_artifact()).expect_err("write fails");
    assert!(err.to_string().contains("report output"));
}

#[test]
fn counts_csv_has_one_row_per_postal_area() {
    let mut buffer = Vec::new();
    write_counts_csv(&mut buffer, &sample_artifact()).expect("csv writes");
    let rendered = String::from_utf8(buffer).expect("csv is utf-8");
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines, vec!["postcode,count", "0870,1", "2450,0"]);
}

#[test]
fn loading_a_malformed_artifact_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("jobs.json");
    std::fs::write(&path, b"{ not json").expect("file written");
    assert!(JobsArtifact::load(&path).is_err());
}
