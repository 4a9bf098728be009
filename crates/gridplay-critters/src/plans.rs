//! Built-in world maps and map loading.

use gridplay_core::{Error, Result};
use std::path::Path;

/// Bouncing critters in a walled room
pub const PLAN1: &[&str] = &[
    "############################",
    "#      #    #      o      ##",
    "#                          #",
    "#          #####           #",
    "##         #   #    ##     #",
    "###           ##     #     #",
    "#           ###      #     #",
    "#   ####                   #",
    "#   ##       o             #",
    "# o  #         o       ### #",
    "#    #                     #",
    "############################",
];

/// Wall followers with one bouncing critter
pub const PLAN2: &[&str] = &[
    "############",
    "#     #    #",
    "#   ~    ~ #",
    "#  ##      #",
    "#  ##  o####",
    "#          #",
    "############",
];

/// Plants and plant eaters
pub const PLAN3: &[&str] = &[
    "############################",
    "#####                 ######",
    "##   ***                **##",
    "#   *##**         **  o  *##",
    "#    ***     o    ##**    *#",
    "#       o         ##***    #",
    "#                 ##**     #",
    "#   o       #*             #",
    "#*          #**       o    #",
    "#***        ##**    o    **#",
    "##****     ###***       *###",
    "############################",
];

pub fn plan_names() -> [&'static str; 3] {
    ["plan1", "plan2", "plan3"]
}

pub fn plan_by_name(name: &str) -> Result<&'static [&'static str]> {
    match name {
        "plan1" => Ok(PLAN1),
        "plan2" => Ok(PLAN2),
        "plan3" => Ok(PLAN3),
        other => Err(Error::NotFound(format!(
            "plan '{other}' (expected one of {})",
            plan_names().join(", ")
        ))),
    }
}

/// Parse map text: one row per line, trailing empty lines dropped.
/// Rows of spaces are open ground and are kept.
pub fn parse_map(text: &str) -> Vec<String> {
    let mut rows: Vec<String> = text
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();
    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    rows
}

pub fn load_map(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let rows = parse_map(&text);
    if rows.is_empty() {
        return Err(Error::Validation(format!("map file {} is empty", path.display())));
    }
    tracing::debug!(path = %path.display(), rows = rows.len(), "Loaded map");
    Ok(rows)
}
