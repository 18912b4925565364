use std::collections::HashMap;
use std::sync::LazyLock;

use crate::errors::{PlanError, Result};
use crate::scalar::ScalarValue;

/// Configuration for planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub default_schema: String,
    pub lowercase_keywords: bool,
    pub verify_unparse: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            default_schema: "main".to_string(),
            lowercase_keywords: false,
            verify_unparse: false,
        }
    }
}

impl PlannerConfig {
    pub fn set_from_scalar(&mut self, name: &str, value: ScalarValue) -> Result<()> {
        let func = GET_SET_FUNCTIONS
            .get(name)
            .ok_or_else(|| PlanError::Config(format!("Missing setting for '{name}'")))?;

        (func.set)(value, self)
    }

    pub fn get_as_scalar(&self, name: &str) -> Result<ScalarValue> {
        let func = GET_SET_FUNCTIONS
            .get(name)
            .ok_or_else(|| PlanError::Config(format!("Missing setting for '{name}'")))?;

        Ok((func.get)(self))
    }

    pub fn reset(&mut self, name: &str) -> Result<()> {
        let def_conf = Self::default();

        let func = GET_SET_FUNCTIONS
            .get(name)
            .ok_or_else(|| PlanError::Config(format!("Missing setting for '{name}'")))?;

        let scalar = (func.get)(&def_conf);
        (func.set)(scalar, self)
    }

    /// Names and descriptions of all settings, sorted by name.
    pub fn settings() -> Vec<(&'static str, &'static str)> {
        let mut settings: Vec<_> = GET_SET_FUNCTIONS
            .iter()
            .map(|(name, funcs)| (*name, funcs.description))
            .collect();
        settings.sort_unstable();
        settings
    }
}

struct SettingFunctions {
    description: &'static str,
    set: fn(scalar: ScalarValue, conf: &mut PlannerConfig) -> Result<()>,
    get: fn(conf: &PlannerConfig) -> ScalarValue,
}

impl SettingFunctions {
    const fn new<S: PlannerSetting>() -> Self {
        SettingFunctions {
            description: S::DESCRIPTION,
            set: S::set_from_scalar as _,
            get: S::get_as_scalar as _,
        }
    }
}

fn insert_setting<S: PlannerSetting>(map: &mut HashMap<&'static str, SettingFunctions>) {
    if map.insert(S::NAME, SettingFunctions::new::<S>()).is_some() {
        panic!("Duplicate settings names: {}", S::NAME);
    }
}

static GET_SET_FUNCTIONS: LazyLock<HashMap<&'static str, SettingFunctions>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    insert_setting::<DefaultSchema>(&mut map);
    insert_setting::<LowercaseKeywords>(&mut map);
    insert_setting::<VerifyUnparse>(&mut map);

    map
});

pub trait PlannerSetting: Sync + Send + 'static {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn set_from_scalar(scalar: ScalarValue, conf: &mut PlannerConfig) -> Result<()>;
    fn get_as_scalar(conf: &PlannerConfig) -> ScalarValue;
}

pub struct DefaultSchema;

impl PlannerSetting for DefaultSchema {
    const NAME: &'static str = "default_schema";
    const DESCRIPTION: &'static str = "Schema used for unqualified table names";

    fn set_from_scalar(scalar: ScalarValue, conf: &mut PlannerConfig) -> Result<()> {
        let val = scalar.try_into_string()?;
        if val.is_empty() {
            return Err(PlanError::Config(
                "Default schema cannot be empty".to_string(),
            ));
        }
        conf.default_schema = val;
        Ok(())
    }

    fn get_as_scalar(conf: &PlannerConfig) -> ScalarValue {
        conf.default_schema.clone().into()
    }
}

pub struct LowercaseKeywords;

impl PlannerSetting for LowercaseKeywords {
    const NAME: &'static str = "lowercase_keywords";
    const DESCRIPTION: &'static str = "Render keywords in lower case";

    fn set_from_scalar(scalar: ScalarValue, conf: &mut PlannerConfig) -> Result<()> {
        conf.lowercase_keywords = scalar.try_as_bool()?;
        Ok(())
    }

    fn get_as_scalar(conf: &PlannerConfig) -> ScalarValue {
        conf.lowercase_keywords.into()
    }
}

pub struct VerifyUnparse;

impl PlannerSetting for VerifyUnparse {
    const NAME: &'static str = "verify_unparse";
    const DESCRIPTION: &'static str =
        "Re-parse rendered SQL and check it binds to the same expression";

    fn set_from_scalar(scalar: ScalarValue, conf: &mut PlannerConfig) -> Result<()> {
        conf.verify_unparse = scalar.try_as_bool()?;
        Ok(())
    }

    fn get_as_scalar(conf: &PlannerConfig) -> ScalarValue {
        conf.verify_unparse.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_reset() {
        let mut conf = PlannerConfig::default();
        conf.set_from_scalar("lowercase_keywords", true.into()).unwrap();
        assert!(conf.lowercase_keywords);
        assert_eq!(
            ScalarValue::Boolean(true),
            conf.get_as_scalar("lowercase_keywords").unwrap()
        );

        conf.reset("lowercase_keywords").unwrap();
        assert!(!conf.lowercase_keywords);
    }

    #[test]
    fn invalid_values() {
        let mut conf = PlannerConfig::default();
        assert!(conf.set_from_scalar("default_schema", "".into()).is_err());
        assert!(conf.set_from_scalar("verify_unparse", 3.into()).is_err());
        assert!(conf.set_from_scalar("missing", true.into()).is_err());
        assert_eq!(PlannerConfig::default(), conf);
    }

    #[test]
    fn settings_listed() {
        let names: Vec<_> = PlannerConfig::settings().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            vec!["default_schema", "lowercase_keywords", "verify_unparse"],
            names
        );
    }
}
