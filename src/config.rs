use crate::{Error, PredicateForm, Result};

pub static PAGINATION_MAX_COUNT: &str = "PAGINATION_MAX_COUNT";
pub static PAGINATION_PREDICATE_FORM: &str = "PAGINATION_PREDICATE_FORM";

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PaginationConfig {
    /// Largest page size a caller may request. Unbounded when absent.
    pub max_limit: Option<u32>,
    #[serde(default)]
    pub form: PredicateForm,
}

impl PaginationConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self> {
        let max_limit = match lookup(PAGINATION_MAX_COUNT) {
            None => None,
            Some(count) => match count.trim().parse::<u32>() {
                Ok(count) if count > 0 => Some(count),
                _ => {
                    return Err(Error::Config {
                        var: PAGINATION_MAX_COUNT,
                        message: format!("expected a positive integer, got '{count}'"),
                    })
                }
            },
        };
        let form = match lookup(PAGINATION_PREDICATE_FORM).as_deref().map(str::trim) {
            None | Some("") | Some("expanded") => PredicateForm::Expanded,
            Some("accumulated") => PredicateForm::Accumulated,
            Some(other) => {
                return Err(Error::Config {
                    var: PAGINATION_PREDICATE_FORM,
                    message: format!("expected 'expanded' or 'accumulated', got '{other}'"),
                })
            }
        };
        Ok(Self { max_limit, form })
    }

    pub fn check_limit(&self, limit: u32) -> Result<()> {
        let too_large = self.max_limit.map_or(false, |max| limit > max);
        if limit == 0 || too_large {
            return Err(Error::InvalidLimit { limit, max: self.max_limit });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::std::collections::HashMap;

    fn lookup(vars: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let vars: HashMap<&'static str, String> = vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = PaginationConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PaginationConfig::default());
        assert_eq!(config.form, PredicateForm::Expanded);
    }

    #[test]
    fn test_reads_variables() {
        let config = PaginationConfig::from_lookup(lookup(&[
            (PAGINATION_MAX_COUNT, "100"),
            (PAGINATION_PREDICATE_FORM, "accumulated"),
        ]))
        .unwrap();
        assert_eq!(config.max_limit, Some(100));
        assert_eq!(config.form, PredicateForm::Accumulated);
    }

    #[test]
    fn test_invalid_variables() {
        let err = PaginationConfig::from_lookup(lookup(&[(PAGINATION_MAX_COUNT, "-1")])).unwrap_err();
        assert!(matches!(err, Error::Config { var: "PAGINATION_MAX_COUNT", .. }));

        let err = PaginationConfig::from_lookup(lookup(&[(PAGINATION_PREDICATE_FORM, "sideways")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for PAGINATION_PREDICATE_FORM: expected 'expanded' or 'accumulated', got 'sideways'"
        );
    }

    #[test]
    fn test_check_limit() {
        let config = PaginationConfig { max_limit: Some(50), ..Default::default() };
        assert!(config.check_limit(50).is_ok());
        assert!(config.check_limit(0).is_err());
        assert!(matches!(config.check_limit(51), Err(Error::InvalidLimit { limit: 51, max: Some(50) })));
        assert!(PaginationConfig::default().check_limit(u32::MAX).is_ok());
    }
}
