//! Corelisp configuration system.
//!
//! All configuration is persisted to ~/.corelisp/conf.txt
//! Format: property=value (one per line, comments with #)
//!
//! CLI:
//!   corelisp conf set property=value
//!   corelisp conf get property
//!   corelisp conf list
//!   corelisp conf reset
//!
//! Properties are grouped by subsystem and documented the way the
//! teacher's `axm::conf` documents its (much larger) bytecode-VM tuning
//! table — this crate only has a handful of knobs, since there is no
//! GC, JIT, or bytecode pipeline to tune, but the load/save/describe
//! machinery is the same shape.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// A configuration property with full documentation.
#[derive(Debug, Clone)]
pub struct PropDef {
    pub name: &'static str,
    pub default: &'static str,
    pub description: &'static str,
    pub performance_impact: &'static str,
    pub memory_impact: &'static str,
    pub category: Category,
    pub production_recommended: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Category {
    Runtime,
    Display,
    Repl,
    Logging,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// All known configuration properties with full documentation.
pub static ALL_PROPS: &[PropDef] = &[
    PropDef {
        name: "max_call_depth",
        default: "1000",
        description: "Maximum nested function-call depth before the evaluator raises an \
                      internal error instead of overflowing the native stack.",
        performance_impact: "NONE (bookkeeping is a single counter increment per call)",
        memory_impact: "NONE",
        category: Category::Runtime,
        production_recommended: "1000",
    },
    PropDef {
        name: "float_display_precision",
        default: "17",
        description: "Significant digits used when rendering a float for `pr-str`/`prn`. \
                      17 is the minimum needed to round-trip any f64 exactly; lower values \
                      trade exactness for shorter output.",
        performance_impact: "NONE",
        memory_impact: "NONE",
        category: Category::Display,
        production_recommended: "17",
    },
    PropDef {
        name: "prompt",
        default: "corelisp=> ",
        description: "Prompt string printed before each line read by the interactive REPL.",
        performance_impact: "NONE",
        memory_impact: "NONE",
        category: Category::Repl,
        production_recommended: "corelisp=> ",
    },
    PropDef {
        name: "print_result_tag",
        default: "on",
        description: "Whether the REPL prefixes each top-level result with `=> ` before \
                      printing it. Scripts run with `corelisp run` never print this \
                      regardless of this setting; it only affects the interactive loop.",
        performance_impact: "NONE",
        memory_impact: "NONE",
        category: Category::Repl,
        production_recommended: "on",
    },
    PropDef {
        name: "log_level",
        default: "warn",
        description: "Default `tracing` filter directive applied when no `RUST_LOG` \
                      environment variable is set. One of error, warn, info, debug, trace.",
        performance_impact: "LOW (trace/debug spans add overhead in hot loops)",
        memory_impact: "NONE",
        category: Category::Logging,
        production_recommended: "warn",
    },
];

/// Loaded, possibly file-overridden, configuration.
pub struct AxConf {
    values: HashMap<String, String>,
}

impl AxConf {
    /// Loads configuration from the default config file path, falling
    /// back to defaults for anything the file doesn't override.
    pub fn load() -> Self {
        let mut conf = AxConf { values: HashMap::new() };
        for prop in ALL_PROPS {
            conf.values.insert(prop.name.to_string(), prop.default.to_string());
        }
        if let Some(path) = Self::config_path() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                for line in contents.lines() {
                    let line = line.trim();
                    if line.starts_with('#') || line.is_empty() {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        conf.values.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }
        conf
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".corelisp").join("conf.txt"))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.get(key), Some("on") | Some("true") | Some("yes") | Some("1"))
    }

    pub fn get_u32(&self, key: &str, default: u32) -> u32 {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        if !ALL_PROPS.iter().any(|p| p.name == key) {
            return Err(format!(
                "Unknown configuration property: '{}'\nRun `corelisp conf list` to see all properties.",
                key
            ));
        }
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path().ok_or("Cannot determine config path")?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| format!("Cannot create config dir: {}", e))?;
        }

        let mut out = String::new();
        out.push_str("# Corelisp Configuration — ~/.corelisp/conf.txt\n");
        out.push_str("# Edit manually or use: corelisp conf set property=value\n");
        out.push_str("# Reset to defaults:   corelisp conf reset\n\n");

        let mut by_category: Vec<(&PropDef, &str)> = ALL_PROPS
            .iter()
            .map(|p| (p, self.values.get(p.name).map(|s| s.as_str()).unwrap_or(p.default)))
            .collect();
        by_category.sort_by_key(|(p, _)| format!("{:?}", p.category));

        let mut current_cat: Option<String> = None;
        for (prop, value) in &by_category {
            let cat = format!("{:?}", prop.category);
            if current_cat.as_ref().map(|s| s.as_str()) != Some(cat.as_str()) {
                out.push_str(&format!("\n# ── {} ─────────────────────────\n", cat));
                current_cat = Some(cat);
            }
            out.push_str(&format!("{}={}\n", prop.name, value));
        }

        std::fs::write(&path, &out).map_err(|e| format!("Cannot write config: {}", e))?;
        Ok(())
    }

    /// Resets the on-disk configuration file to defaults.
    pub fn reset() -> Result<(), String> {
        let path = Self::config_path().ok_or("Cannot determine config path")?;
        let mut out = String::new();
        out.push_str("# Corelisp Configuration — reset to defaults\n\n");
        for prop in ALL_PROPS {
            out.push_str(&format!("{}={}\n", prop.name, prop.default));
        }
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| format!("Cannot create config dir: {}", e))?;
        }
        std::fs::write(&path, &out).map_err(|e| format!("Cannot reset config: {}", e))?;
        println!("Configuration reset to defaults at {}", path.display());
        Ok(())
    }

    /// Prints every property with its current value to stdout.
    pub fn list(&self) {
        let mut by_category: Vec<&PropDef> = ALL_PROPS.iter().collect();
        by_category.sort_by_key(|p| format!("{:?}", p.category));

        let mut current_cat: Option<String> = None;
        for prop in by_category {
            let cat = format!("{}", prop.category);
            if current_cat.as_ref().map(|s| s.as_str()) != Some(cat.as_str()) {
                println!();
                println!("── {} ─────────────────────────", cat);
                current_cat = Some(cat);
            }
            let current = self.get(prop.name).unwrap_or(prop.default);
            let marker = if current == prop.default { "  " } else { "* " };
            println!("{}{:<24} = {:<14}  (default: {})", marker, prop.name, current, prop.default);
        }
        println!();
        println!("  * = overridden from default");
        println!("  Config file: {}", Self::config_path().map(|p| p.display().to_string()).unwrap_or_else(|| "N/A".into()));
    }

    /// Prints detailed documentation for one property.
    pub fn describe(&self, key: &str) {
        let prop = ALL_PROPS.iter().find(|p| p.name == key);
        match prop {
            None => println!("Unknown property: '{}'. Run `corelisp conf list` to see all.", key),
            Some(p) => {
                let current = self.get(p.name).unwrap_or(p.default);
                println!("── {} ─────────────────────────", p.name);
                println!("  Category:             {}", p.category);
                println!("  Current value:        {}", current);
                println!("  Default value:        {}", p.default);
                println!("  Production default:   {}", p.production_recommended);
                println!();
                println!("  Description:");
                for line in textwrap(p.description, 68) {
                    println!("    {}", line);
                }
                println!();
                println!("  Performance impact:   {}", p.performance_impact);
                println!("  Memory impact:        {}", p.memory_impact);
            }
        }
    }

    pub fn max_call_depth(&self) -> u32 {
        self.get_u32("max_call_depth", 1000)
    }

    pub fn float_display_precision(&self) -> u32 {
        self.get_u32("float_display_precision", 17)
    }

    pub fn prompt(&self) -> &str {
        self.get("prompt").unwrap_or("corelisp=> ")
    }

    pub fn print_result_tag(&self) -> bool {
        self.get_bool("print_result_tag")
    }

    pub fn log_level(&self) -> &str {
        self.get("log_level").unwrap_or("warn")
    }
}

impl Default for AxConf {
    fn default() -> Self {
        AxConf::load()
    }
}

fn textwrap(s: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let words: Vec<&str> = s.split_whitespace().collect();
    let mut current = String::new();
    for word in words {
        if current.len() + word.len() + 1 > width && !current.is_empty() {
            lines.push(current.trim().to_string());
            current = String::new();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `conf set property=value` — parses and applies one assignment.
pub fn cmd_conf_set(spec: &str) -> Result<(), String> {
    let (key, value) = spec
        .split_once('=')
        .ok_or_else(|| format!("expected property=value, got '{}'", spec))?;
    let mut conf = AxConf::load();
    conf.set(key.trim(), value.trim())?;
    println!("{} = {}", key.trim(), value.trim());
    Ok(())
}

/// `conf get property` — prints one property's current value.
pub fn cmd_conf_get(key: &str) -> Result<(), String> {
    let conf = AxConf::load();
    match conf.get(key) {
        Some(v) => {
            println!("{}", v);
            Ok(())
        }
        None => Err(format!("Unknown configuration property: '{}'", key)),
    }
}

/// `conf list` — prints every property grouped by category.
pub fn cmd_conf_list() {
    AxConf::load().list();
}

/// `conf reset` — resets the on-disk file to defaults.
pub fn cmd_conf_reset() -> Result<(), String> {
    AxConf::reset()
}

/// `conf describe property` — prints one property's full documentation.
pub fn cmd_conf_describe(key: &str) {
    AxConf::load().describe(key);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_accessor() {
        let conf = AxConf { values: HashMap::new() };
        // with no overrides at all, accessors must still fall back sanely
        assert_eq!(conf.max_call_depth(), 1000);
        assert_eq!(conf.float_display_precision(), 17);
        assert_eq!(conf.prompt(), "corelisp=> ");
        assert_eq!(conf.log_level(), "warn");
    }

    #[test]
    fn set_rejects_unknown_property() {
        let mut conf = AxConf::load();
        assert!(conf.set("not_a_real_property", "x").is_err());
    }

    #[test]
    fn every_prop_default_round_trips_through_get() {
        let conf = AxConf::load();
        for prop in ALL_PROPS {
            assert_eq!(conf.get(prop.name), Some(prop.default));
        }
    }
}
