//! CSV writers backed by the csv crate

use std::path::Path;

use crate::{Result, pipeline::EpisodeRecord, q_learning::QTable, types::ActionSet};

/// Write the per-episode training log.
///
/// Columns: `episode,reward,steps,epsilon,q_table_size`.
pub fn write_episode_csv(path: &Path, records: &[EpisodeRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one row per stored state: `x,y,v,gap` followed by one column per
/// action, in action-set order. Rows are sorted by state.
pub fn write_q_table_csv(path: &Path, q_table: &QTable, actions: &ActionSet) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["x".to_string(), "y".to_string(), "v".to_string(), "gap".to_string()];
    header.extend(actions.iter().map(|action| format!("q_{action}")));
    writer.write_record(&header)?;

    for (state, values) in q_table.iter_sorted() {
        let row: Vec<String> = state
            .to_array()
            .into_iter()
            .map(|component| component.to_string())
            .chain(values.iter().map(|value| value.to_string()))
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
