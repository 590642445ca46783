//! Cross-year harmonization: maps every edition's standardized CSV onto one
//! canonical column set, tags rows with their dataset year and reference
//! period, and writes per-year plus combined outputs.

pub mod columns;

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::schema::DatasetSchema;
use crate::settings::{SectorAlias, Settings};
use crate::table::{self, Table};
use columns::Field;

pub const FINAL_COLUMNS: [&str; 14] = [
    "dataset_year",
    "period_start",
    "period_end",
    "rank",
    "company_name",
    "sector",
    "absolute_growth_rate",
    "compound_annual_growth_rate",
    "revenue_start",
    "revenue_end",
    "employees_start",
    "employees_end",
    "founding_year",
    "website",
];

const UNRANKED: f64 = 999.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub dataset_year: u16,
    pub period_start: u16,
    pub period_end: u16,
    pub rank: Option<f64>,
    pub company_name: String,
    pub sector: String,
    pub absolute_growth_rate: Option<f64>,
    pub compound_annual_growth_rate: Option<f64>,
    pub revenue_start: Option<f64>,
    pub revenue_end: Option<f64>,
    pub employees_start: Option<f64>,
    pub employees_end: Option<f64>,
    pub founding_year: Option<f64>,
    pub website: String,
}

fn num(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

impl Company {
    /// Cells in `FINAL_COLUMNS` order; missing numbers are empty.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.dataset_year.to_string(),
            self.period_start.to_string(),
            self.period_end.to_string(),
            num(self.rank),
            self.company_name.clone(),
            self.sector.clone(),
            num(self.absolute_growth_rate),
            num(self.compound_annual_growth_rate),
            num(self.revenue_start),
            num(self.revenue_end),
            num(self.employees_start),
            num(self.employees_end),
            num(self.founding_year),
            self.website.clone(),
        ]
    }
}

/// Map one standardized table onto canonical columns. When several source
/// headers map to the same field the leftmost wins.
pub fn harmonize_table(
    source: &Table,
    schema: &DatasetSchema,
    aliases: &[SectorAlias],
) -> Vec<Company> {
    let mut mapping: HashMap<Field, usize> = HashMap::new();
    for (i, header) in source.headers.iter().enumerate() {
        if let Some(field) = columns::map_header(header, schema.period_end) {
            mapping.entry(field).or_insert(i);
        }
    }

    let mut companies: Vec<Company> = source
        .rows
        .iter()
        .map(|row| {
            let text = |f: Field| {
                mapping
                    .get(&f)
                    .and_then(|&i| row.get(i))
                    .map(String::as_str)
                    .unwrap_or("")
            };
            let number = |f: Field| columns::clean_number(text(f));

            Company {
                dataset_year: schema.year,
                period_start: schema.period_start,
                period_end: schema.period_end,
                rank: number(Field::Rank),
                company_name: text(Field::CompanyName).trim().to_string(),
                sector: columns::clean_sector(text(Field::Sector), aliases),
                absolute_growth_rate: number(Field::AbsoluteGrowthRate),
                compound_annual_growth_rate: number(Field::CompoundAnnualGrowthRate),
                revenue_start: number(Field::RevenueStart),
                revenue_end: number(Field::RevenueEnd),
                employees_start: number(Field::EmployeesStart),
                employees_end: number(Field::EmployeesEnd),
                founding_year: number(Field::FoundingYear),
                website: text(Field::Website).trim().to_string(),
            }
        })
        .collect();

    companies.sort_by(|a, b| {
        a.rank
            .unwrap_or(UNRANKED)
            .total_cmp(&b.rank.unwrap_or(UNRANKED))
    });
    companies
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub datasets: usize,
    pub years: Vec<u16>,
    pub unique_sectors: usize,
    pub period_range: Option<(u16, u16)>,
    /// Ten most common sectors, most frequent first; ties keep first-seen order.
    pub top_sectors: Vec<(String, usize)>,
    /// Per column, how many rows have no value. Columns with none missing are omitted.
    pub missing: Vec<(&'static str, usize)>,
}

impl Summary {
    pub fn build(companies: &[Company], datasets: usize) -> Self {
        let mut years: Vec<u16> = companies.iter().map(|c| c.dataset_year).collect();
        years.sort_unstable();
        years.dedup();

        let mut sector_counts: Vec<(String, usize)> = Vec::new();
        for c in companies.iter().filter(|c| !c.sector.is_empty()) {
            match sector_counts.iter_mut().find(|(s, _)| *s == c.sector) {
                Some((_, n)) => *n += 1,
                None => sector_counts.push((c.sector.clone(), 1)),
            }
        }
        let unique_sectors = sector_counts.len();
        sector_counts.sort_by(|a, b| b.1.cmp(&a.1));
        sector_counts.truncate(10);

        let period_range = companies
            .iter()
            .map(|c| c.period_start)
            .min()
            .zip(companies.iter().map(|c| c.period_end).max());

        let missing = FINAL_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let n = companies
                    .iter()
                    .filter(|c| c.to_row()[i].is_empty())
                    .count();
                (*col, n)
            })
            .filter(|(_, n)| *n > 0)
            .collect();

        Summary {
            total: companies.len(),
            datasets,
            years,
            unique_sectors,
            period_range,
            top_sectors: sector_counts,
            missing,
        }
    }

    pub fn print(&self) {
        println!("\n=== STANDARDIZATION SUMMARY ===");
        println!("Total companies processed: {}", self.total);
        println!("Datasets processed: {}", self.datasets);
        let years: Vec<String> = self.years.iter().map(u16::to_string).collect();
        println!("Years covered: {}", years.join(", "));
        println!("Unique sectors: {}", self.unique_sectors);
        if let Some((start, end)) = self.period_range {
            println!("Period range: {}-{}", start, end);
        }

        println!("\n=== SECTOR DISTRIBUTION ===");
        for (sector, count) in &self.top_sectors {
            println!("{}: {}", sector, count);
        }

        println!("\n=== DATA QUALITY CHECK ===");
        println!("Missing values per column:");
        for (col, n) in &self.missing {
            println!("{}: {}", col, n);
        }
    }
}

/// Harmonize every configured year found as `<year>_standardized.csv` in `dir`.
/// Returns `None` when no year file exists.
pub fn harmonize_dir(dir: &Path, settings: &Settings) -> Result<Option<Summary>> {
    let mut all = Vec::new();
    let mut datasets = 0;

    for schema in &settings.datasets {
        let path = dir.join(format!("{}_standardized.csv", schema.year));
        if !path.exists() {
            warn!(year = schema.year, "standardized file missing");
            println!("Warning: {} not found", path.display());
            continue;
        }

        println!("Processing {} dataset...", schema.year);
        let source = table::read(&path, false)?;
        let companies = harmonize_table(&source, schema, &settings.sector_aliases);

        let out = dir.join(format!("{}_fully_standardized.csv", schema.year));
        table::write(&out, &FINAL_COLUMNS, companies.iter().map(Company::to_row))?;
        println!("Saved standardized {} dataset to {}", schema.year, out.display());

        datasets += 1;
        all.extend(companies);
    }

    if all.is_empty() {
        return Ok(None);
    }

    let combined = dir.join(&settings.combined_file);
    table::write(&combined, &FINAL_COLUMNS, all.iter().map(Company::to_row))?;
    println!("Saved combined dataset to {}", combined.display());
    info!(rows = all.len(), datasets, "Harmonized");

    let summary = Summary::build(&all, datasets);
    summary.print();
    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::load(None).unwrap()
    }

    fn schema(year: u16) -> DatasetSchema {
        crate::schema::find(&settings().datasets, year).unwrap().clone()
    }

    const STD_2020: &str = "\
Rank,Name,Website,Sector,Absolute growth rate (in %),Compound annual growth rate (CAGR) (in %),Revenue 2018 (in SGD),Revenue 2015 (in SGD),Number of employees 2018,Number of employees 2015,Founding year
2,Beta,https://beta.sg,IT & Software,812.0,108.9,4100000.0,450000.0,35,9,2014
1,Alpha,https://alpha.sg,Real Estate,1234.5,136.1,9800000.0,740000.0,120,14,2016
,Ghost,,,n.a.,,,,,,
";

    #[test]
    fn maps_and_cleans_rows() {
        let source = table::parse(STD_2020, b',').unwrap();
        let s = settings();
        let rows = harmonize_table(&source, &schema(2020), &s.sector_aliases);

        assert_eq!(rows.len(), 3);
        let alpha = &rows[0];
        assert_eq!(alpha.company_name, "Alpha");
        assert_eq!((alpha.period_start, alpha.period_end), (2015, 2018));
        assert_eq!(alpha.revenue_end, Some(9_800_000.0));
        assert_eq!(alpha.revenue_start, Some(740_000.0));
        assert_eq!(alpha.employees_end, Some(120.0));
        assert_eq!(alpha.employees_start, Some(14.0));

        assert_eq!(rows[1].sector, "Technology");
        assert_eq!(rows[2].company_name, "Ghost");
        assert_eq!(rows[2].rank, None);
        assert_eq!(rows[2].absolute_growth_rate, None);
    }

    #[test]
    fn row_layout() {
        let source = table::parse(STD_2020, b',').unwrap();
        let rows = harmonize_table(&source, &schema(2020), &[]);
        assert_eq!(
            rows[0].to_row().join(","),
            "2020,2015,2018,1,Alpha,Real Estate,1234.5,136.1,740000,9800000,14,120,2016,https://alpha.sg"
        );
    }

    #[test]
    fn summary_counts() {
        let source = table::parse(STD_2020, b',').unwrap();
        let rows = harmonize_table(&source, &schema(2020), &settings().sector_aliases);
        let summary = Summary::build(&rows, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.years, vec![2020]);
        assert_eq!(summary.unique_sectors, 2);
        assert_eq!(summary.period_range, Some((2015, 2018)));
        assert!(summary.missing.contains(&("rank", 1)));
        assert!(summary.missing.contains(&("website", 1)));
        assert!(!summary.missing.iter().any(|(c, _)| *c == "company_name"));
    }

    #[test]
    fn directory_run() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("2020_standardized.csv"), STD_2020).unwrap();
        std::fs::write(
            dir.path().join("2021_standardized.csv"),
            "Rank,Name,Sector,Revenue 2019 (in SGD),Revenue 2016 (in SGD)\n1,Gamma,E-commerce,10.0,2.0\n",
        )
        .unwrap();

        let s = settings();
        let summary = harmonize_dir(dir.path(), &s).unwrap().unwrap();
        assert_eq!(summary.datasets, 2);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.years, vec![2020, 2021]);
        assert_eq!(summary.period_range, Some((2015, 2019)));

        let per_year = table::read(&dir.path().join("2021_fully_standardized.csv"), false).unwrap();
        assert_eq!(per_year.headers, FINAL_COLUMNS);
        assert_eq!(per_year.rows[0][5], "Ecommerce");
        assert_eq!(per_year.rows[0][8], "2");
        assert_eq!(per_year.rows[0][9], "10");

        let combined = table::read(&dir.path().join(&s.combined_file), false).unwrap();
        assert_eq!(combined.rows.len(), 4);
        assert_eq!(combined.rows[3][0], "2021");
    }

    #[test]
    fn directory_without_inputs() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(harmonize_dir(dir.path(), &settings()).unwrap(), None);
    }
}
