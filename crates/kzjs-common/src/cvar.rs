// cvar.rs: server-wide console variables

use std::collections::HashMap;

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CvarFlags: u32 {
        /// Saved with the server config.
        const ARCHIVE = 1;
        /// Only `force_set` may change it.
        const NOSET = 8;
    }
}

pub const CVAR_ARCHIVE: CvarFlags = CvarFlags::ARCHIVE;
pub const CVAR_NOSET: CvarFlags = CvarFlags::NOSET;

#[derive(Debug, Clone)]
pub struct Cvar {
    pub string: String,
    pub default_string: String,
    pub flags: CvarFlags,
    /// `string` parsed as a float, 0 when it is not numeric.
    pub value: f32,
}

impl Cvar {
    fn new(value: &str, flags: CvarFlags) -> Self {
        Self {
            string: value.to_string(),
            default_string: value.to_string(),
            flags,
            value: parse_value(value),
        }
    }

    fn assign(&mut self, value: &str) {
        self.string = value.to_string();
        self.value = parse_value(value);
    }
}

fn parse_value(s: &str) -> f32 {
    s.trim().parse().unwrap_or(0.0)
}

#[derive(Debug, Default)]
pub struct CvarContext {
    vars: HashMap<String, Cvar>,
}

impl CvarContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_var(&self, name: &str) -> Option<&Cvar> {
        self.vars.get(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn variable_value(&self, name: &str) -> f32 {
        self.find_var(name).map_or(0.0, |var| var.value)
    }

    pub fn variable_string(&self, name: &str) -> &str {
        self.find_var(name).map_or("", |var| var.string.as_str())
    }

    /// Register a cvar with its default. An existing cvar keeps its value and
    /// gains the new flags.
    pub fn register(&mut self, name: &str, default: &str, flags: CvarFlags) {
        self.vars
            .entry(name.to_string())
            .and_modify(|var| var.flags |= flags)
            .or_insert_with(|| Cvar::new(default, flags));
    }

    fn set_internal(&mut self, name: &str, value: &str, force: bool) -> bool {
        let Some(var) = self.vars.get_mut(name) else {
            log::debug!("cvar {} created by set", name);
            self.vars.insert(name.to_string(), Cvar::new(value, CvarFlags::empty()));
            return true;
        };
        if !force && var.flags.contains(CvarFlags::NOSET) {
            log::warn!("{} is write protected", name);
            return false;
        }
        if var.string == value {
            return false;
        }
        var.assign(value);
        log::debug!("cvar {} = \"{}\"", name, value);
        true
    }

    /// Returns true when the stored string changed.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        self.set_internal(name, value, false)
    }

    /// Like `set`, but ignores NOSET.
    pub fn force_set(&mut self, name: &str, value: &str) -> bool {
        self.set_internal(name, value, true)
    }

    /// Whole numbers are stored without a fraction.
    pub fn set_value(&mut self, name: &str, value: f32) -> bool {
        let s = if value.fract() == 0.0 { format!("{}", value as i64) } else { value.to_string() };
        self.set(name, &s)
    }

    /// Put a cvar back to its registered default.
    pub fn reset(&mut self, name: &str) -> bool {
        match self.find_var(name).map(|var| var.default_string.clone()) {
            Some(default) => self.force_set(name, &default),
            None => false,
        }
    }

    /// `set <name> <value>` from the server console.
    pub fn set_f(&mut self, argv: &[&str]) -> bool {
        match argv {
            [_, name, value] => {
                self.set(name, value);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIER: &str = "kz_js_default_sound_tier";

    #[test]
    fn test_register_and_read() {
        let mut ctx = CvarContext::new();
        ctx.register(TIER, "4", CVAR_ARCHIVE);
        assert_eq!(ctx.variable_value(TIER), 4.0);
        assert_eq!(ctx.variable_string(TIER), "4");
        assert!(ctx.find_var(TIER).unwrap().flags.contains(CVAR_ARCHIVE));
    }

    #[test]
    fn test_register_twice_keeps_value_and_merges_flags() {
        let mut ctx = CvarContext::new();
        ctx.register(TIER, "4", CVAR_ARCHIVE);
        ctx.set(TIER, "meh");
        ctx.register(TIER, "2", CVAR_NOSET);
        assert_eq!(ctx.variable_string(TIER), "meh");
        assert_eq!(ctx.find_var(TIER).unwrap().flags, CVAR_ARCHIVE | CVAR_NOSET);
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_set_reports_change() {
        let mut ctx = CvarContext::new();
        ctx.register(TIER, "4", CvarFlags::empty());
        assert!(ctx.set(TIER, "wrecker"));
        assert!(!ctx.set(TIER, "wrecker"));
        assert_eq!(ctx.variable_value(TIER), 0.0);
    }

    #[test]
    fn test_noset_needs_force() {
        let mut ctx = CvarContext::new();
        ctx.register(TIER, "4", CVAR_NOSET);
        assert!(!ctx.set(TIER, "1"));
        assert_eq!(ctx.variable_string(TIER), "4");
        assert!(ctx.force_set(TIER, "1"));
        assert_eq!(ctx.variable_value(TIER), 1.0);
    }

    #[test]
    fn test_set_value_formatting() {
        let mut ctx = CvarContext::new();
        ctx.set_value(TIER, 3.5);
        assert_eq!(ctx.variable_string(TIER), "3.5");
        ctx.set_value(TIER, 4.0);
        assert_eq!(ctx.variable_string(TIER), "4");
    }

    #[test]
    fn test_reset_to_default() {
        let mut ctx = CvarContext::new();
        ctx.register(TIER, "4", CVAR_NOSET);
        ctx.force_set(TIER, "6");
        assert!(ctx.reset(TIER));
        assert_eq!(ctx.variable_string(TIER), "4");
        assert!(!ctx.reset("missing"));
    }

    #[test]
    fn test_unknown_reads_empty() {
        let ctx = CvarContext::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.variable_value("missing"), 0.0);
        assert_eq!(ctx.variable_string("missing"), "");
    }

    #[test]
    fn test_set_f() {
        let mut ctx = CvarContext::new();
        assert!(ctx.set_f(&["set", TIER, "godlike"]));
        assert_eq!(ctx.variable_string(TIER), "godlike");
        assert!(!ctx.set_f(&["set", TIER]));
    }
}
