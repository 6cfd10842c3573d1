//! Canonical symbols of the logging API for one compilation.
//!
//! Resolution is by fully-qualified metadata name through the compilation's
//! symbol table and identity afterwards is by `SymbolId`, so user types
//! that shadow well-known simple names never match.

use crate::semantic::{Compilation, MethodSymbol, SymbolId, TypeRef};

const NS: &str = "Microsoft.Extensions.Logging";

#[derive(Debug, Clone)]
pub struct LoggingTypes {
    pub logger_interface: SymbolId,
    pub generic_logger_interface: Option<SymbolId>,
    pub log_level: SymbolId,
    pub event_id: SymbolId,
    pub exception: SymbolId,
    pub logger_message_attribute: SymbolId,
    pub logger_message_class: SymbolId,
    pub key_value_pair: SymbolId,
    pub enumerable: SymbolId,
    pub log_properties_attribute: Option<SymbolId>,
    pub tag_provider_attribute: Option<SymbolId>,
    pub tag_name_attribute: Option<SymbolId>,
    pub tag_collector: Option<SymbolId>,
    pub data_classification_attribute: Option<SymbolId>,
}

impl LoggingTypes {
    /// `None` when the compilation does not reference the logging API;
    /// the driver skips such compilations.
    pub fn resolve(compilation: &Compilation) -> Option<Self> {
        let get = |name: &str| compilation.get_type_by_metadata_name(name);
        Some(Self {
            logger_interface: get(&format!("{NS}.ILogger"))?,
            generic_logger_interface: get(&format!("{NS}.ILogger`1")),
            log_level: get(&format!("{NS}.LogLevel"))?,
            event_id: get(&format!("{NS}.EventId"))?,
            exception: get("System.Exception")?,
            logger_message_attribute: get(&format!("{NS}.LoggerMessageAttribute"))?,
            logger_message_class: get(&format!("{NS}.LoggerMessage"))?,
            key_value_pair: get("System.Collections.Generic.KeyValuePair`2")?,
            enumerable: get("System.Collections.Generic.IEnumerable`1")?,
            log_properties_attribute: get(&format!("{NS}.LogPropertiesAttribute")),
            tag_provider_attribute: get(&format!("{NS}.TagProviderAttribute")),
            tag_name_attribute: get(&format!("{NS}.TagNameAttribute")),
            tag_collector: get(&format!("{NS}.ITagCollector")),
            data_classification_attribute: get(
                "Microsoft.Extensions.Compliance.Classification.DataClassificationAttribute",
            ),
        })
    }

    /// Instance method on the logger interface, or an extension helper
    /// whose first formal parameter is the logger interface.
    pub fn is_logger_method(&self, method: &MethodSymbol) -> bool {
        if !method.is_static && method.containing == self.logger_interface {
            return true;
        }
        method.is_extension
            && method
                .params
                .first()
                .map(|p| p.ty.is_symbol(self.logger_interface))
                .unwrap_or(false)
    }

    pub fn is_exception_type(&self, compilation: &Compilation, ty: &TypeRef) -> bool {
        compilation.is_subtype(ty, &TypeRef::named(self.exception))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_against_seeded_corlib() {
        let compilation = Compilation::parse([("a.cs", "class C { }")]).unwrap();
        let registry = LoggingTypes::resolve(&compilation).unwrap();
        assert_ne!(registry.logger_interface, registry.log_level);
        assert!(registry.log_properties_attribute.is_some());
    }

    #[test]
    fn shadowing_user_type_does_not_match() {
        // A user-defined ILogger lives under its own namespace; the
        // registry only sees the canonical one.
        let source = r#"
namespace MyApp
{
    public interface ILogger { void Log(string message); }
}
"#;
        let compilation = Compilation::parse([("a.cs", source)]).unwrap();
        let registry = LoggingTypes::resolve(&compilation).unwrap();
        let shadow = compilation.get_type_by_metadata_name("MyApp.ILogger").unwrap();
        assert_ne!(registry.logger_interface, shadow);
    }
}
