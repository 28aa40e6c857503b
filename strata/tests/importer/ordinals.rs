use crate::helpers::{PROJECT, creds, db_config, keyed, mocked, url};
use proptest::prelude::*;
use strata::{Importer, StrataError};
use strata_mock::FAILING_TABLE;

/// Table and join column pairs; some are skipped with a warning.
const TABLES: &[(&str, &str)] = &[
    ("line1", "Timestamp"),
    ("line2", "Time"),
    ("status", "Timestamp"),
    ("missing", "Timestamp"),
    (FAILING_TABLE, "Timestamp"),
    ("line2", "Timestamp"),
];

/// Folder and join column pairs; `Mixed` on "1" fails as a whole.
const FOLDERS: &[(&str, &str)] = &[
    ("Shared Documents/Sensors", "0"),
    ("Shared Documents/Mixed", "0"),
    ("Shared Documents/Mixed", "1"),
    ("Shared Documents/Empty", "0"),
];

#[derive(Debug, Clone)]
enum Step {
    Database(Vec<usize>),
    Folder(usize),
    File,
    Local,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        proptest::collection::vec(0..TABLES.len(), 1..4).prop_map(Step::Database),
        (0..FOLDERS.len()).prop_map(Step::Folder),
        Just(Step::File),
        Just(Step::Local),
    ]
}

async fn run(importer: &mut Importer, step: &Step) -> Result<Vec<usize>, StrataError> {
    match step {
        Step::Database(picks) => {
            let names: Vec<&str> = picks.iter().map(|&i| TABLES[i].0).collect();
            let joins: Vec<&str> = picks.iter().map(|&i| TABLES[i].1).collect();
            importer
                .register_from_database(&db_config(), &names, &joins)
                .await
        }
        Step::Folder(i) => {
            let (folder, join) = FOLDERS[*i];
            importer
                .register_from_folder(&creds(), PROJECT, &url(folder), join)
                .await
        }
        Step::File => importer
            .register_from_file(
                &creds(),
                PROJECT,
                &url("Shared Documents/Loose/readings.csv"),
                "0",
            )
            .await
            .map(|ordinal| vec![ordinal]),
        Step::Local => importer
            .register("local", keyed("k", &[1.0], "v", &[2.0]), "k")
            .map(|ordinal| vec![ordinal]),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ordinals_stay_contiguous_across_mixed_imports(
        steps in proptest::collection::vec(arb_step(), 1..8)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (mut importer, _, docs) = mocked();
        let mut returned = Vec::new();
        for step in &steps {
            // Failed calls register nothing.
            if let Ok(ordinals) = rt.block_on(run(&mut importer, step)) {
                returned.extend(ordinals);
            }
        }

        let registry = importer.registered();
        let expected: Vec<usize> = (0..registry.len()).collect();
        prop_assert_eq!(&returned, &expected);
        let stored: Vec<usize> = registry.iter().map(|s| s.ordinal).collect();
        prop_assert_eq!(stored, expected);
        prop_assert!(docs.connections() <= 1);
    }
}
