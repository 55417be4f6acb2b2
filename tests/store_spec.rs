use std::fs;

use speculate2::speculate;
use timecard::clock::FixedClock;
use timecard::models::*;
use timecard::store::RecordStore;
use timecard::tracker::{clock_out, start_session, CompanySelector};
use timecard::TimecardError;

fn populated_profile() -> FreelancerProfile {
    let clock = FixedClock::at(2026, 10, 19, 9, 0, 0);
    let mut profile = FreelancerProfile::new("Ada", "EUR");
    profile.total_earnings = 120.5;
    start_session(&mut profile, CompanySelector::New("Acme".to_string()), 25.0, &clock)
        .expect("Failed to start");
    clock_out(&mut profile, "Fixed bug", &clock);
    start_session(&mut profile, CompanySelector::New("Globex".to_string()), 40.0, &clock)
        .expect("Failed to start");
    profile
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("freelancer_data.json");
        let store = RecordStore::new(&path);
    }

    describe "load" {
        it "returns the default profile when the file is missing" {
            let profile = store.load();
            assert_eq!(profile, FreelancerProfile::default());
        }

        it "returns the default profile when the file is empty" {
            fs::write(&path, "  \n").expect("Failed to write");
            assert_eq!(store.load(), FreelancerProfile::default());
        }

        it "returns the default profile when the file is not valid JSON" {
            fs::write(&path, "{ not json").expect("Failed to write");
            assert_eq!(store.load(), FreelancerProfile::default());
        }

        it "uses the supplied fallback when nothing is stored" {
            let profile = store.load_or_else(|| FreelancerProfile::new("Ada", "GBP"));
            assert_eq!(profile.name, "Ada");
            assert_eq!(profile.currency, "GBP");
        }

        it "surfaces parse errors from try_load" {
            fs::write(&path, "[1, 2").expect("Failed to write");
            assert!(matches!(store.try_load(), Err(TimecardError::Serialization(_))));
        }

        it "reads documents written without epoch fields" {
            fs::write(&path, r#"{
                "freelancer": {
                    "name": "John Doe",
                    "companies": [
                        {
                            "companyName": "Acme",
                            "sessions": [
                                {
                                    "sessionId": "1",
                                    "description": "",
                                    "pay": 25.0,
                                    "startTimestamp": "Mon Oct 19 09:00:00 2026",
                                    "endTimestamp": "",
                                    "billingStatus": "Pending"
                                }
                            ]
                        }
                    ],
                    "totalEarnings": 0.0,
                    "currency": "USD",
                    "activeCompanyIndex": 0,
                    "activeSessionIndex": 0
                }
            }"#).expect("Failed to write");

            let profile = store.load();
            assert_eq!(profile.companies.len(), 1);
            assert_eq!(profile.companies[0].sessions[0].session_id, "1");
            assert_eq!(profile.active, Some(ActiveRef { company_index: 0, session_index: 0 }));
            assert!(profile.is_consistent());
        }

        it "closes open sessions the pointer does not reference" {
            fs::write(&path, r#"{"freelancer": {"name": "A", "totalEarnings": 0, "currency": "USD",
                "companies": [{"companyName": "Acme", "sessions": [
                    {"sessionId": "1", "description": "", "pay": 20.0,
                     "startTimestamp": "Mon Oct 19 09:00:00 2026", "endTimestamp": "",
                     "billingStatus": "Pending"},
                    {"sessionId": "2", "description": "", "pay": 20.0,
                     "startTimestamp": "Mon Oct 19 10:00:00 2026", "endTimestamp": "",
                     "billingStatus": "Pending"}
                ]}],
                "activeCompanyIndex": 0, "activeSessionIndex": 1}}"#).expect("Failed to write");

            let mut profile = store.load();
            assert!(profile.is_consistent());
            assert_eq!(profile.open_sessions(), [ActiveRef { company_index: 0, session_index: 1 }]);
            let first = &profile.companies[0].sessions[0];
            assert_eq!(first.end_timestamp, "Mon Oct 19 09:00:00 2026");

            let clock = FixedClock::at(2026, 10, 19, 11, 0, 0);
            clock_out(&mut profile, "done", &clock);
            start_session(&mut profile, CompanySelector::Existing(0), 20.0, &clock)
                .expect("Failed to start");
            clock_out(&mut profile, "again", &clock);
            assert!(profile.is_consistent());
            assert!(profile.open_sessions().is_empty());
        }

        it "keeps the latest open session active when the pointer is clear" {
            fs::write(&path, r#"{"freelancer": {"name": "A", "totalEarnings": 0, "currency": "USD",
                "companies": [{"companyName": "Acme", "sessions": [
                    {"sessionId": "1", "description": "", "pay": 20.0,
                     "startTimestamp": "Mon Oct 19 10:00:00 2026", "endTimestamp": "",
                     "billingStatus": "Pending"},
                    {"sessionId": "2", "description": "", "pay": 20.0,
                     "startTimestamp": "Mon Oct 19 08:00:00 2026", "endTimestamp": "",
                     "billingStatus": "Pending"}
                ]}],
                "activeCompanyIndex": -1, "activeSessionIndex": -1}}"#).expect("Failed to write");

            let profile = store.load();
            assert!(profile.is_consistent());
            assert_eq!(profile.active, Some(ActiveRef { company_index: 0, session_index: 0 }));
        }

        it "clears a pointer that references a missing session" {
            fs::write(&path, r#"{"freelancer": {"name": "A", "companies": [],
                "totalEarnings": 0, "currency": "USD",
                "activeCompanyIndex": 2, "activeSessionIndex": 5}}"#).expect("Failed to write");
            assert!(store.load().active.is_none());
        }
    }

    describe "save" {
        it "round-trips every field" {
            let profile = populated_profile();
            store.save(&profile).expect("Failed to save");

            let loaded = store.try_load().expect("Failed to load").expect("Profile missing");
            assert_eq!(loaded, profile);
        }

        it "writes the documented layout" {
            store.save(&populated_profile()).expect("Failed to save");

            let value: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&path).expect("Failed to read"))
                    .expect("Invalid JSON");
            let freelancer = &value["freelancer"];
            assert_eq!(freelancer["name"], "Ada");
            assert_eq!(freelancer["currency"], "EUR");
            assert_eq!(freelancer["totalEarnings"], 120.5);
            assert_eq!(freelancer["activeCompanyIndex"], 1);
            assert_eq!(freelancer["activeSessionIndex"], 0);

            let session = &freelancer["companies"][0]["sessions"][0];
            assert_eq!(freelancer["companies"][0]["companyName"], "Acme");
            assert_eq!(session["sessionId"], "1");
            assert_eq!(session["description"], "Fixed bug");
            assert_eq!(session["pay"], 25.0);
            assert_eq!(session["startTimestamp"], "Mon Oct 19 09:00:00 2026");
            assert_eq!(session["endTimestamp"], "Mon Oct 19 09:00:00 2026");
            assert_eq!(session["billingStatus"], "Pending");
        }

        it "writes negative sentinels when idle" {
            store.save(&FreelancerProfile::default()).expect("Failed to save");
            let content = fs::read_to_string(&path).expect("Failed to read");
            assert!(content.contains("\"activeCompanyIndex\": -1"));
            assert!(content.contains("\"activeSessionIndex\": -1"));
        }

        it "replaces the previous document and leaves no temp file" {
            store.save(&populated_profile()).expect("Failed to save");
            store.save(&FreelancerProfile::default()).expect("Failed to save");

            assert_eq!(store.load(), FreelancerProfile::default());
            let leftovers: Vec<_> = fs::read_dir(dir.path())
                .expect("Failed to list")
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
                .collect();
            assert!(leftovers.is_empty());
        }

        it "creates missing parent directories" {
            let nested = RecordStore::new(dir.path().join("a/b/data.json"));
            nested.save(&FreelancerProfile::default()).expect("Failed to save");
            assert!(dir.path().join("a/b/data.json").exists());
        }

        it "fails with an I/O error when the destination is a directory" {
            fs::create_dir(&path).expect("Failed to create dir");
            let result = store.save(&FreelancerProfile::default());
            assert!(matches!(result, Err(TimecardError::Io(_))));
        }
    }
}
