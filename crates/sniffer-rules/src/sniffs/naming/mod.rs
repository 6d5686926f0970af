//! Naming convention sniffs

mod camel_caps_method_name;

pub use camel_caps_method_name::CamelCapsMethodNameSniff;
