use super::profile::{NameCase, VendorProfile};

/// Catch-all profile for products no other strategy claims.
///
/// Uses only the portable catalog rows and filters the system schema
/// names common to the well-known vendors.
pub fn generic_profile() -> VendorProfile {
    VendorProfile::new("Generic")
        .as_fallback()
        .with_system_schemas(["information_schema", "sys", "mysql"], NameCase::Insensitive)
        .with_system_prefix("pg_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_profile_is_fallback() {
        let profile = generic_profile();
        assert!(profile.is_fallback());
        assert!(profile.matches("FooDB 1.0"));
        assert!(profile.queries().procedures.is_none());
    }

    #[test]
    fn test_generic_profile_rejects_common_system_schemas() {
        let profile = generic_profile();
        for system in ["information_schema", "SYS", "mysql", "pg_catalog", ""] {
            assert!(!profile.should_include_schema(system), "{system:?}");
        }
        assert!(profile.should_include_schema("app"));
    }
}
