mod common;
use strata::{Column, IfExists, Table, export_table};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let connector = common::get_database();
    let config = common::database_config()?;

    let table = Table::new(vec![
        Column::text("DateTime", ["2023-01-01 00:00", "2023-01-01 00:01"]),
        Column::numeric("Temperature", [20.5, 20.7]),
    ])?;

    // Replace whatever a previous run left behind.
    let rows = export_table(connector.as_ref(), &config, "merged_demo", &table, IfExists::Replace)
        .await?;
    println!("wrote {rows} rows to merged_demo");

    // A second write in Fail mode is refused.
    if let Err(e) =
        export_table(connector.as_ref(), &config, "merged_demo", &table, IfExists::Fail).await
    {
        println!("second write refused: {e}");
    }
    Ok(())
}
