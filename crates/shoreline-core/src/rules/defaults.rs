use super::condition::{Condition, Operator};
use super::{Logic, RuleSet, ZoneDefinition};

/// Built-in rule set: nine zone types, `no_data` first and `stable` as the
/// catch-all. Trend thresholds are in m/year, beach slope is tan(beta).
pub fn default_zone_definitions() -> RuleSet {
    RuleSet::new([
        (
            "no_data",
            ZoneDefinition::new(1, vec![Condition::is_null("trend")]).with_template(
                "No data zone spanning {length_km:.1f}km where insufficient observations prevent trend analysis.",
            ),
        ),
        (
            "rapid_erosion",
            ZoneDefinition::new(2, vec![Condition::compare("trend", Operator::Lt, -0.8)]).with_template(
                "Critical erosion hotspot spanning {length_km:.1f}km with average retreat of {avg_trend_abs:.1f}m/year. This area requires immediate attention and monitoring.",
            ),
        ),
        (
            "moderate_erosion",
            ZoneDefinition::new(3, vec![Condition::compare("trend", Operator::Lt, -0.3)]).with_template(
                "Erosion zone extending {length_km:.1f}km showing consistent retreat averaging {avg_trend_abs:.1f}m/year. Ongoing erosion processes are evident.",
            ),
        ),
        (
            "rapid_accretion",
            ZoneDefinition::new(4, vec![Condition::compare("trend", Operator::Gt, 0.8)]).with_template(
                "Dynamic accretion zone over {length_km:.1f}km with significant sand accumulation averaging {avg_trend:.1f}m/year. This area shows strong sediment deposition.",
            ),
        ),
        (
            "moderate_accretion",
            ZoneDefinition::new(5, vec![Condition::compare("trend", Operator::Gt, 0.3)]).with_template(
                "Stable accretion zone spanning {length_km:.1f}km with gradual beach building averaging {avg_trend:.1f}m/year. Positive sediment balance is maintained.",
            ),
        ),
        (
            "high_uncertainty",
            ZoneDefinition::new(
                6,
                vec![
                    Condition::compare("r2_score", Operator::Lt, 0.05).allowing_null(),
                    Condition::compare("rmse", Operator::Gt, 30.0).allowing_null(),
                ],
            )
            .with_logic(Logic::Or)
            .with_template(
                "Data-limited zone over {length_km:.1f}km where shoreline trends are difficult to determine reliably. Additional monitoring may be needed.",
            ),
        ),
        (
            "steep_beach",
            ZoneDefinition::new(7, vec![Condition::compare("beach_slope", Operator::Gt, 0.08)]).with_template(
                "High-energy beach zone over {length_km:.1f}km characterized by steep beach profiles. This area may be vulnerable to storm impacts.",
            ),
        ),
        (
            "low_energy",
            ZoneDefinition::new(8, vec![Condition::compare("beach_slope", Operator::Lt, 0.04)]).with_template(
                "Protected shoreline segment spanning {length_km:.1f}km with gentle beach profiles indicating low wave energy conditions.",
            ),
        ),
        (
            "stable",
            ZoneDefinition::new(9, vec![]).with_template(
                "Stable shoreline segment extending {length_km:.1f}km showing minimal change over time. This area exhibits natural equilibrium.",
            ),
        ),
    ]
    .map(|(name, definition)| (name.to_string(), definition)))
}
