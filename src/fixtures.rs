#[cfg(test)]
pub mod test {
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::config::Tiercfg;
    use crate::document::parse_str;
    use crate::env::StaticEnv;

    /// Shared settings, as a base file would hold them.
    pub const BASE_DOC: &str = r#"# Shared settings
APP_NAME = tcfg

STRING_A = string_a
STRING_B = string_b
STRING_C = string_c
STRING_D = string_d
TCFG_STRING_D = tcfg_string_d
STRING_E = "${STRING_A}_${STRING_B}"
STRING_F = string_f\nstring_f

STRINGS_A = strings_a1,strings_a2
STRINGS_B = strings_b1,strings_b2
STRINGS_D = ${STRING_A},${INT64_A}

VAL_A = a1,a2
VAL_B = val_b
VAL_C = $[VAL_A]_$[STRINGS_B]
VAL_D = $${STRING_A} and $$[VAL_A]
VAL_E = ${VAL_B}-$${STRING_A}

INT_A = 1
INT_B = one
INT64_A = 2
FLOAT_A = 3.4
FLOAT_B = x
BOOL_A = true
BOOL_B = maybe
DURATION_A = 3m
DURATION_B = 3

; never converges
LOOP = ${LOOP}
MISSING_REF = ${UNKNOWN}

[dev]
STRING_C = dev_string_c
"#;

    /// Machine-specific overrides.
    pub const LOCAL_DOC: &str = r#"STRING_B = local_string_b

[dev]
STRING_C = local_dev_string_c
"#;

    /// Write `content` to `dir/name`, creating `dir` if needed.
    pub fn write_doc(dir: &Path, name: &str, content: &str) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// A configuration over [`LOCAL_DOC`] and [`BASE_DOC`] with the given environment.
    pub fn layered(env: StaticEnv) -> Tiercfg {
        let local = parse_str(Path::new("."), LOCAL_DOC).unwrap();
        let base = parse_str(Path::new("."), BASE_DOC).unwrap();
        Tiercfg::new(env, local, base)
    }

    #[test]
    fn fixture_documents_parse() {
        let cfg = layered(StaticEnv::new());
        assert!(cfg.base().has_section("DEV"));
        assert_eq!(cfg.base().key_comment("LOOP").as_deref(), Some(" never converges"));
        assert_eq!(cfg.local().len(), 2);
    }
}
