/// Folder served by `MockDocumentStore`.
pub const SENSOR_FOLDER: &str = "/sites/Telemetry/Shared Documents/Sensors";
/// Folder whose second file has a single column, so it cannot be keyed on "1".
pub const MIXED_FOLDER: &str = "/sites/Telemetry/Shared Documents/Mixed";
/// Folder with no files.
pub const EMPTY_FOLDER: &str = "/sites/Telemetry/Shared Documents/Empty";

const FILES: &[(&str, &str)] = &[
    (
        "/sites/Telemetry/Shared Documents/Sensors/humidity.csv",
        "2023-01-01 00:00,41\n2023-01-01 00:03,44\n",
    ),
    (
        "/sites/Telemetry/Shared Documents/Sensors/flow.csv",
        "2023-01-01 00:01,7.5\n2023-01-01 00:04,7.9\n",
    ),
    (
        "/sites/Telemetry/Shared Documents/Mixed/ok.csv",
        "2023-01-01 00:00,1,2\n",
    ),
    (
        "/sites/Telemetry/Shared Documents/Mixed/short.csv",
        "2023-01-01 00:00\n",
    ),
    (
        "/sites/Telemetry/Shared Documents/Loose/readings.csv",
        "2023-01-01 00:00,3\n2023-01-01 00:02,5\n",
    ),
];

/// Server-relative paths of the files directly inside `folder`.
pub fn list(folder: &str) -> Option<Vec<String>> {
    let folder = folder.trim_end_matches('/');
    if folder == EMPTY_FOLDER {
        return Some(Vec::new());
    }
    let files: Vec<String> = FILES
        .iter()
        .filter(|(path, _)| {
            path.rsplit_once('/')
                .is_some_and(|(parent, _)| parent == folder)
        })
        .map(|(path, _)| (*path).to_string())
        .collect();
    (!files.is_empty()).then_some(files)
}

/// Contents of the file at `path`.
pub fn open(path: &str) -> Option<Vec<u8>> {
    FILES
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, body)| body.as_bytes().to_vec())
}
