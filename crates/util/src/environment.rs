use std::env;

/// Read an environment variable, treating unset and blank values alike.
pub fn non_empty_env(name: &str) -> Option<String> {
    let value = env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_ignored() {
        temp_env::with_var("NAVSPHERE_TEST_BLANK", Some("   "), || {
            assert_eq!(non_empty_env("NAVSPHERE_TEST_BLANK"), None);
        });
        temp_env::with_var("NAVSPHERE_TEST_SET", Some(" octo "), || {
            assert_eq!(non_empty_env("NAVSPHERE_TEST_SET").as_deref(), Some("octo"));
        });
        temp_env::with_var_unset("NAVSPHERE_TEST_UNSET", || {
            assert_eq!(non_empty_env("NAVSPHERE_TEST_UNSET"), None);
        });
    }
}
