//! Content-based hashing for run IDs.

use ik_kinematics::Query;
use ik_project::ReactionFile;
use sha2::{Digest, Sha256};

/// Hash of the reaction file, the queries in order, and the solver version.
pub fn compute_run_id(
    file: &ReactionFile,
    queries: &[Query],
    solver_version: &str,
) -> crate::ResultsResult<String> {
    let mut hasher = Sha256::new();

    let file_json = serde_json::to_string(file)?;
    hasher.update(file_json.as_bytes());

    hasher.update((queries.len() as u64).to_le_bytes());
    for query in queries {
        hasher.update(query.ex_mev.to_bits().to_le_bytes());
        hasher.update(query.z_cm.to_bits().to_le_bytes());
    }

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ik_project::schema::*;

    fn nucleus(label: &str, mass_u: f64, mass_number: u32) -> NucleusDef {
        NucleusDef {
            label: label.to_string(),
            mass_u,
            mass_number,
        }
    }

    fn file() -> ReactionFile {
        ReactionFile {
            version: 1,
            name: "Test".to_string(),
            reaction: ReactionDef {
                beam: nucleus("28Mg", 27.983_876_8, 28),
                target: nucleus("2H", 2.014_101_777_85, 2),
                ejectile: nucleus("1H", 1.007_825_032_07, 1),
                recoil: nucleus("29Mg", 28.988_6, 29),
                beam_energy_mev_per_u: 9.473,
            },
            spectrometer: SpectrometerDef {
                field_t: 2.5,
                ejectile_charge: 1,
                array: ArrayDef::Radius { radius_cm: 1.18 },
            },
            solver: SolverDef::default(),
        }
    }

    #[test]
    fn hash_stability() {
        let queries = [Query::new(0.0, -20.0), Query::new(1.0, 10.0)];
        let hash1 = compute_run_id(&file(), &queries, "v1").unwrap();
        let hash2 = compute_run_id(&file(), &queries, "v1").unwrap();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let queries = [Query::new(0.0, -20.0), Query::new(1.0, 10.0)];
        let base = compute_run_id(&file(), &queries, "v1").unwrap();

        let mut other_field = file();
        other_field.spectrometer.field_t = 3.0;
        assert_ne!(base, compute_run_id(&other_field, &queries, "v1").unwrap());

        let reordered = [Query::new(1.0, 10.0), Query::new(0.0, -20.0)];
        assert_ne!(base, compute_run_id(&file(), &reordered, "v1").unwrap());

        assert_ne!(base, compute_run_id(&file(), &queries, "v2").unwrap());
    }
}
