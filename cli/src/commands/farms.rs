//! `geocrop farms` and `geocrop area`

use std::io::Write;

use shared::farms::FarmStore;
use shared::geometry::{format_area, polygon_area_acres, Boundary};
use shared::storage::KeyValueStorage;
use shared::{Coordinates, NewFarm};
use tracing::info;

use crate::cli::FarmsCommand;
use crate::error::{CliError, CliResult};

pub fn run<S: KeyValueStorage, W: Write>(
    command: FarmsCommand,
    storage: S,
    out: &mut W,
) -> CliResult<()> {
    let store = FarmStore::new(storage);

    match command {
        FarmsCommand::List => {
            let farms = store.list();
            if farms.is_empty() {
                writeln!(out, "No registered farms")?;
            }
            for farm in &farms {
                writeln!(
                    out,
                    "{}  {}  {}  {}  ({})",
                    farm.id, farm.name, farm.soil_type, farm.area, farm.coordinates
                )?;
            }
        }
        FarmsCommand::Add {
            name,
            lat,
            lng,
            soil_type,
            boundary,
        } => {
            let mut input = NewFarm::new(name, Coordinates::new(lat, lng));
            if let Some(soil_type) = soil_type {
                input = input.with_soil_type(soil_type);
            }
            if let Some(boundary) = boundary {
                input = input.with_boundary(parse_boundary(&boundary)?);
            }
            let farm = store.add(input)?;
            info!(id = farm.id, "Farm registered");
            writeln!(out, "{}  {}  {}", farm.id, farm.name, farm.area)?;
        }
        FarmsCommand::Remove { id } => {
            if !store.remove(id)? {
                return Err(CliError::NotFound(format!("Farm {id}")));
            }
            writeln!(out, "Removed farm {id}")?;
        }
        FarmsCommand::Area => {
            let farms = store.list();
            let total = store.total_area_acres();
            writeln!(out, "{} across {} farms", format_area(total), farms.len())?;
        }
    }
    Ok(())
}

/// Print the estimated area of a JSON point array
pub fn estimate_area<W: Write>(points_json: &str, out: &mut W) -> CliResult<()> {
    let points: Vec<Coordinates> = serde_json::from_str(points_json)?;
    let acres = polygon_area_acres(&points);
    writeln!(out, "{} ({acres:.4} acres)", format_area(acres))?;
    Ok(())
}

fn parse_boundary(json: &str) -> CliResult<Boundary> {
    let points: Vec<Coordinates> = serde_json::from_str(json)?;
    Ok(Boundary::new(points)?)
}
