use std::sync::OnceLock;

use regex::Regex;
use sniffer_core::{token::OO_SCOPES, Dispatch, File, Finding, Ptr, Sniff, TokenKind};

/// Magic methods, lowercased without the leading `__`
const MAGIC_METHODS: &[&str] = &[
    "construct",
    "destruct",
    "call",
    "callstatic",
    "get",
    "set",
    "isset",
    "unset",
    "sleep",
    "wakeup",
    "serialize",
    "unserialize",
    "tostring",
    "set_state",
    "clone",
    "invoke",
    "debuginfo",
];

/// `SoapClient` methods that also start with `__`
const DOUBLE_UNDERSCORE_METHODS: &[&str] = &[
    "dorequest",
    "getcookies",
    "getfunctions",
    "getlastrequest",
    "getlastrequestheaders",
    "getlastresponse",
    "getlastresponseheaders",
    "gettypes",
    "setcookie",
    "setlocation",
    "setsoapheaders",
    "soapcall",
];

/// Starts with a lowercase letter or an acronym and holds only letters
/// and digits
fn is_camel_caps(name: &str) -> bool {
    static CAMEL_CAPS: OnceLock<Regex> = OnceLock::new();
    CAMEL_CAPS
        .get_or_init(|| Regex::new(r"^(?:[A-Z]{2,}|[a-z])").expect("static pattern"))
        .is_match(name)
        && name.chars().skip(1).all(|c| c.is_ascii_alphanumeric())
}

fn is_magic(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("__").filter(|r| !r.starts_with('_') && !r.is_empty()) else {
        return false;
    };
    let rest = rest.to_lowercase();
    MAGIC_METHODS.contains(&rest.as_str()) || DOUBLE_UNDERSCORE_METHODS.contains(&rest.as_str())
}

/// Method names are camelCase; magic methods and all-caps names are
/// exempt, as are plain functions and closures
pub struct CamelCapsMethodNameSniff;

impl Sniff for CamelCapsMethodNameSniff {
    fn name(&self) -> &'static str {
        "Stefna.Naming.CamelCapsMethodName"
    }

    fn description(&self) -> &'static str {
        "Method names in camel caps"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Function]
    }

    fn dispatch(&self) -> Dispatch {
        Dispatch::Scoped(OO_SCOPES)
    }

    fn process_within_scope<'s>(&self, file: &File<'s>, ptr: Ptr<'s>, scope: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        // functions nested deeper belong to some other scope
        if tokens.deepest_condition(ptr).map(|(p, _)| p) != Some(scope) {
            return Vec::new();
        }
        let Some(name) = tokens.declaration_name(ptr) else {
            return Vec::new();
        };
        if is_magic(name) || name.to_uppercase() == name {
            return Vec::new();
        }

        let test_name = name.trim_start_matches('_');
        if test_name.is_empty() || is_camel_caps(test_name) {
            return Vec::new();
        }

        let class = tokens.declaration_name(scope).unwrap_or("[Anonymous Class]");
        vec![Finding::error(
            ptr,
            "NotCamelCaps",
            format!("Method name \"{}::{}\" is not in camel caps format", class, name),
        )]
    }
}
