mod common;
use strata::{FillPolicy, Importer};

const SENSORS: &str =
    "https://contoso.sharepoint.com/sites/Telemetry/Shared%20Documents/Sensors";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    // 1. Wire the importer to a database and a document library.
    let mut importer = Importer::builder()
        .with_database(common::get_database())
        .with_document_store(common::get_document_store())
        .build()?;

    // 2. Pull two production-line tables, each keyed on its own time column.
    //    "scrap" does not exist; it is skipped with a warning.
    let ordinals = importer
        .register_from_database(
            &common::database_config()?,
            &["line1", "scrap", "line2"],
            &["Timestamp", "Timestamp", "Time"],
        )
        .await?;
    println!("database tables registered as {ordinals:?}");

    // 3. Every CSV in the sensor folder, keyed on its first column.
    let ordinals = importer
        .register_from_folder(&common::sharepoint_credentials()?, "Telemetry", SENSORS, "0")
        .await?;
    println!("sensor files registered as {ordinals:?}");

    // 4. Merge, name the key and move everything onto a one-minute grid.
    let report = importer.produce_report("1min", "DateTime", Some(FillPolicy::Forward))?;
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    println!("resampled: {}", report.resampled);
    println!("{}", report.table);

    Ok(())
}
