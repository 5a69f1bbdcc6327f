/// A named win-percent band; bounds are `[lower, upper)`
#[derive(Debug, Clone)]
pub struct MatchupTypeConfig {
    pub name: &'static str,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub color: &'static str,
}

impl MatchupTypeConfig {
    pub fn new(name: &'static str, lower_bound: f64, upper_bound: f64, color: &'static str) -> Self {
        Self {
            name,
            lower_bound,
            upper_bound,
            color,
        }
    }
}

/// Default matchup-type bands seeded into a fresh database.
///
/// Pairs with fewer than two meetings report a win percent of -5 and land
/// in "No Data".
pub fn get_matchup_types() -> Vec<MatchupTypeConfig> {
    vec![
        MatchupTypeConfig::new("No Data", -10.0, 0.0, "#9E9E9E"),
        MatchupTypeConfig::new("Nightmare", 0.0, 20.0, "#C62828"),
        MatchupTypeConfig::new("Losing", 20.0, 40.0, "#EF6C00"),
        MatchupTypeConfig::new("Even", 40.0, 60.0, "#FDD835"),
        MatchupTypeConfig::new("Winning", 60.0, 80.0, "#7CB342"),
        MatchupTypeConfig::new("Dominant", 80.0, 101.0, "#2E7D32"),
    ]
}
