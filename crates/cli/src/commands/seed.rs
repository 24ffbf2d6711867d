//! Seed government scheme entries from a YAML file.
//!
//! The file holds a list of schemes:
//!
//! ```yaml
//! schemes:
//!   - name: Crop Insurance Scheme
//!     category: insurance
//!     description: Premium support for seasonal crop insurance.
//!     eligibility: All farmers growing notified crops.
//!     benefits: Covers yield loss from natural calamities.
//!     application_url: https://example.gov/crop-insurance
//! ```
//!
//! Seeding is idempotent by scheme name: entries whose name already exists
//! in the database are skipped.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use grow_smart_api::db::schemes::{SchemeInput, SchemeRepository};
use grow_smart_api::db::{self};

/// File shape.
#[derive(Debug, Deserialize)]
struct SchemeSeedFile {
    schemes: Vec<SchemeSeed>,
}

#[derive(Debug, Deserialize)]
struct SchemeSeed {
    name: String,
    category: String,
    description: String,
    #[serde(default)]
    eligibility: Option<String>,
    #[serde(default)]
    benefits: Option<String>,
    #[serde(default)]
    application_url: Option<String>,
}

/// Seed schemes from a YAML file.
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file cannot
/// be read or parsed, or database operations fail.
pub async fn schemes(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading schemes from file");

    // Read and validate YAML before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let file: SchemeSeedFile = serde_yaml::from_str(&content)?;

    let errors = validate(&file.schemes);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    info!(schemes = file.schemes.len(), "Parsed and validated seed file");

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let repo = SchemeRepository::new(&pool);

    let existing: HashSet<String> = repo
        .list(None)
        .await?
        .into_iter()
        .map(|s| s.name)
        .collect();

    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for seed in file.schemes {
        if existing.contains(&seed.name) {
            skipped += 1;
            continue;
        }

        repo.create(SchemeInput {
            name: seed.name,
            category: seed.category,
            description: seed.description,
            eligibility: seed.eligibility,
            benefits: seed.benefits,
            application_url: seed.application_url,
        })
        .await?;
        inserted += 1;
    }

    info!("Seeding complete!");
    info!("  Schemes inserted: {inserted}");
    info!("  Schemes skipped (already exist): {skipped}");

    Ok(())
}

/// Validate the parsed seed entries before touching the database.
fn validate(seeds: &[SchemeSeed]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, seed) in seeds.iter().enumerate() {
        if seed.name.trim().is_empty() {
            errors.push(format!("scheme #{}: name is empty", i + 1));
        }
        if seed.category.trim().is_empty() {
            errors.push(format!("scheme '{}': category is empty", seed.name));
        }
        if seed.description.trim().is_empty() {
            errors.push(format!("scheme '{}': description is empty", seed.name));
        }
        if !seen.insert(seed.name.clone()) {
            errors.push(format!("scheme '{}': duplicate name in file", seed.name));
        }
    }

    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_file() {
        let yaml = r"
schemes:
  - name: Crop Insurance Scheme
    category: insurance
    description: Premium support for seasonal crop insurance.
    eligibility: All farmers growing notified crops.
  - name: Soil Health Card
    category: advisory
    description: Free periodic soil testing.
";
        let file: SchemeSeedFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.schemes.len(), 2);
        assert!(file.schemes[1].benefits.is_none());
        assert!(validate(&file.schemes).is_empty());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_blanks() {
        let yaml = r"
schemes:
  - name: Dup
    category: a
    description: b
  - name: Dup
    category: ''
    description: c
";
        let file: SchemeSeedFile = serde_yaml::from_str(yaml).unwrap();
        let errors = validate(&file.schemes);
        assert_eq!(errors.len(), 2);
    }
}
