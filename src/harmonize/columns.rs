use std::sync::LazyLock;

use regex::Regex;

use crate::settings::SectorAlias;

static NUMBER_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap()
});

/// Canonical cross-year column a source header maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Rank,
    CompanyName,
    Website,
    Sector,
    AbsoluteGrowthRate,
    CompoundAnnualGrowthRate,
    RevenueStart,
    RevenueEnd,
    EmployeesStart,
    EmployeesEnd,
    FoundingYear,
}

/// Keyword match, first rule wins. Revenue and employee columns that mention
/// `period_end` are the end-of-period figures; any other year is the start.
pub fn map_header(header: &str, period_end: u16) -> Option<Field> {
    let lower = header.to_lowercase();
    let has = |kw: &str| lower.contains(kw);
    let is_end = header.contains(&period_end.to_string());

    let field = if has("rank") {
        Field::Rank
    } else if has("name") && !has("sector") {
        Field::CompanyName
    } else if has("website") {
        Field::Website
    } else if has("sector") {
        Field::Sector
    } else if has("absolute") && has("growth") {
        Field::AbsoluteGrowthRate
    } else if (has("compound") || has("cagr")) && has("growth") {
        Field::CompoundAnnualGrowthRate
    } else if has("revenue") {
        if is_end { Field::RevenueEnd } else { Field::RevenueStart }
    } else if has("employee") {
        if is_end { Field::EmployeesEnd } else { Field::EmployeesStart }
    } else if has("founding") {
        Field::FoundingYear
    } else {
        return None;
    };
    Some(field)
}

/// Lenient number parse: drops separators and whitespace, a trailing `%`, and
/// anything after the leading numeric part. Empty, `nan` and junk give `None`.
pub fn clean_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() || value == "nan" {
        return None;
    }
    let compact: String = value
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let compact = compact.strip_suffix('%').unwrap_or(&compact);
    NUMBER_PREFIX_RE
        .find(compact)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

pub fn clean_sector(sector: &str, aliases: &[SectorAlias]) -> String {
    let sector = sector.trim();
    let sector = sector
        .strip_prefix(['"', '\''])
        .unwrap_or(sector)
        .trim_end();
    aliases
        .iter()
        .find(|a| a.from.trim() == sector)
        .map(|a| a.to.clone())
        .unwrap_or_else(|| sector.to_string())
}
