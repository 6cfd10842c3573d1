//! Seeded core-library symbols.
//!
//! The compilation has no assembly metadata reader, so the types the
//! analyzed code links against (`System`, the collections, and the
//! `Microsoft.Extensions.Logging` surface) are declared programmatically
//! into the symbol store. They resolve by fully-qualified metadata name
//! exactly like user symbols do.

use crate::semantic::symbols::{
    ConstValue, FieldId, FieldSymbol, MethodId, MethodSymbol, ParamSymbol, PropertySymbol,
    SymbolId, SymbolStore, TypeKind, TypeRef,
};

#[derive(Debug)]
pub struct Corlib {
    pub object: SymbolId,
    pub string_: SymbolId,
    pub bool_: SymbolId,
    pub char_: SymbolId,
    pub byte: SymbolId,
    pub sbyte: SymbolId,
    pub int16: SymbolId,
    pub uint16: SymbolId,
    pub int32: SymbolId,
    pub uint32: SymbolId,
    pub int64: SymbolId,
    pub uint64: SymbolId,
    pub float: SymbolId,
    pub double: SymbolId,
    pub decimal: SymbolId,
    pub void_: SymbolId,
    pub exception: SymbolId,
    pub type_: SymbolId,
    pub nullable: SymbolId,
    pub idisposable: SymbolId,
    pub datetime: SymbolId,
    pub datetimeoffset: SymbolId,
    pub timespan: SymbolId,
    pub guid: SymbolId,
    pub uri: SymbolId,
    pub attribute: SymbolId,
    pub task: SymbolId,
    pub task_1: SymbolId,
    pub ienumerable_1: SymbolId,
    pub list_1: SymbolId,
    pub dictionary_2: SymbolId,
    pub kvp_2: SymbolId,
    /// `Action` delegates indexed by arity (0..=8).
    pub actions: Vec<SymbolId>,
    /// `Func` delegates indexed by arity - 1 (1..=8).
    pub funcs: Vec<SymbolId>,
    pub ilogger: SymbolId,
    pub ilogger_1: SymbolId,
    pub log_level: SymbolId,
    pub event_id: SymbolId,
    pub logger_extensions: SymbolId,
    pub logger_message: SymbolId,
    pub logger_message_attribute: SymbolId,
    pub log_properties_attribute: SymbolId,
    pub tag_provider_attribute: SymbolId,
    pub tag_name_attribute: SymbolId,
    pub itag_collector: SymbolId,
    pub data_classification_attribute: SymbolId,
}

const LOG_LEVELS: &[(&str, i64)] = &[
    ("Trace", 0),
    ("Debug", 1),
    ("Information", 2),
    ("Warning", 3),
    ("Error", 4),
    ("Critical", 5),
    ("None", 6),
];

fn p(name: &str, ty: TypeRef) -> ParamSymbol {
    ParamSymbol {
        name: name.to_string(),
        ty,
        is_params: false,
        is_this: false,
        has_default: false,
        attributes: Vec::new(),
    }
}

fn p_this(name: &str, ty: TypeRef) -> ParamSymbol {
    ParamSymbol {
        is_this: true,
        ..p(name, ty)
    }
}

fn p_params(name: &str, ty: TypeRef) -> ParamSymbol {
    ParamSymbol {
        is_params: true,
        ..p(name, ty)
    }
}

fn p_default(name: &str, ty: TypeRef) -> ParamSymbol {
    ParamSymbol {
        has_default: true,
        ..p(name, ty)
    }
}

fn method(
    store: &mut SymbolStore,
    containing: SymbolId,
    name: &str,
    type_params: &[&str],
    params: Vec<ParamSymbol>,
    return_type: TypeRef,
    is_static: bool,
) -> MethodId {
    let is_extension = is_static && params.first().map(|pr| pr.is_this).unwrap_or(false);
    store.add_method(MethodSymbol {
        id: MethodId(0),
        name: name.to_string(),
        containing,
        type_params: type_params.iter().map(|s| s.to_string()).collect(),
        params,
        return_type,
        is_static,
        is_extension,
        is_partial: false,
        is_public: true,
        attributes: Vec::new(),
        decl: None,
    })
}

fn property(store: &mut SymbolStore, containing: SymbolId, name: &str, ty: TypeRef) {
    store.add_property(PropertySymbol {
        id: crate::semantic::symbols::PropertyId(0),
        name: name.to_string(),
        containing,
        ty,
        is_static: false,
        is_public: true,
        has_getter: true,
        attributes: Vec::new(),
    });
}

pub fn seed(store: &mut SymbolStore) -> Corlib {
    let prim = |store: &mut SymbolStore, name: &str, kind: TypeKind, keyword: &'static str| {
        let id = store.add_type("System", name, kind, Vec::new());
        store.type_symbol_mut(id).keyword = Some(keyword);
        id
    };

    let object = prim(store, "Object", TypeKind::Class, "object");
    let string_ = prim(store, "String", TypeKind::Class, "string");
    let bool_ = prim(store, "Boolean", TypeKind::Struct, "bool");
    let char_ = prim(store, "Char", TypeKind::Struct, "char");
    let byte = prim(store, "Byte", TypeKind::Struct, "byte");
    let sbyte = prim(store, "SByte", TypeKind::Struct, "sbyte");
    let int16 = prim(store, "Int16", TypeKind::Struct, "short");
    let uint16 = prim(store, "UInt16", TypeKind::Struct, "ushort");
    let int32 = prim(store, "Int32", TypeKind::Struct, "int");
    let uint32 = prim(store, "UInt32", TypeKind::Struct, "uint");
    let int64 = prim(store, "Int64", TypeKind::Struct, "long");
    let uint64 = prim(store, "UInt64", TypeKind::Struct, "ulong");
    let float = prim(store, "Single", TypeKind::Struct, "float");
    let double = prim(store, "Double", TypeKind::Struct, "double");
    let decimal = prim(store, "Decimal", TypeKind::Struct, "decimal");
    let void_ = prim(store, "Void", TypeKind::Struct, "void");

    let exception = store.add_type("System", "Exception", TypeKind::Class, Vec::new());
    property(store, exception, "Message", TypeRef::named(string_));
    for derived in ["ArgumentException", "InvalidOperationException", "ArgumentNullException"] {
        let id = store.add_type("System", derived, TypeKind::Class, Vec::new());
        store.type_symbol_mut(id).base_types = vec![TypeRef::named(exception)];
    }

    let type_ = store.add_type("System", "Type", TypeKind::Class, Vec::new());
    let nullable = store.add_type("System", "Nullable", TypeKind::Struct, vec!["T".into()]);
    let idisposable = store.add_type("System", "IDisposable", TypeKind::Interface, Vec::new());
    let datetime = store.add_type("System", "DateTime", TypeKind::Struct, Vec::new());
    let datetimeoffset = store.add_type("System", "DateTimeOffset", TypeKind::Struct, Vec::new());
    let timespan = store.add_type("System", "TimeSpan", TypeKind::Struct, Vec::new());
    let guid = store.add_type("System", "Guid", TypeKind::Struct, Vec::new());
    let uri = store.add_type("System", "Uri", TypeKind::Class, Vec::new());
    let attribute = store.add_type("System", "Attribute", TypeKind::Class, Vec::new());
    let task = store.add_type("System.Threading.Tasks", "Task", TypeKind::Class, Vec::new());
    let task_1 = store.add_type(
        "System.Threading.Tasks",
        "Task",
        TypeKind::Class,
        vec!["TResult".into()],
    );

    method(store, object, "ToString", &[], Vec::new(), TypeRef::named(string_), false);

    let ienumerable_1 = store.add_type(
        "System.Collections.Generic",
        "IEnumerable",
        TypeKind::Interface,
        vec!["T".into()],
    );
    let kvp_2 = store.add_type(
        "System.Collections.Generic",
        "KeyValuePair",
        TypeKind::Struct,
        vec!["TKey".into(), "TValue".into()],
    );
    property(store, kvp_2, "Key", TypeRef::TypeParam("TKey".into()));
    property(store, kvp_2, "Value", TypeRef::TypeParam("TValue".into()));

    let list_1 = store.add_type(
        "System.Collections.Generic",
        "List",
        TypeKind::Class,
        vec!["T".into()],
    );
    store.type_symbol_mut(list_1).base_types = vec![TypeRef::generic(
        ienumerable_1,
        vec![TypeRef::TypeParam("T".into())],
    )];

    let dictionary_2 = store.add_type(
        "System.Collections.Generic",
        "Dictionary",
        TypeKind::Class,
        vec!["TKey".into(), "TValue".into()],
    );
    store.type_symbol_mut(dictionary_2).base_types = vec![TypeRef::generic(
        ienumerable_1,
        vec![TypeRef::generic(
            kvp_2,
            vec![
                TypeRef::TypeParam("TKey".into()),
                TypeRef::TypeParam("TValue".into()),
            ],
        )],
    )];

    let actions: Vec<SymbolId> = (0..=8)
        .map(|arity| {
            let params = (1..=arity).map(|i| format!("T{i}")).collect();
            store.add_type("System", "Action", TypeKind::Delegate, params)
        })
        .collect();
    let funcs: Vec<SymbolId> = (1..=8)
        .map(|arity| {
            let mut params: Vec<String> = (1..arity).map(|i| format!("T{i}")).collect();
            params.push("TResult".into());
            store.add_type("System", "Func", TypeKind::Delegate, params)
        })
        .collect();

    // Microsoft.Extensions.Logging surface.
    const MEL: &str = "Microsoft.Extensions.Logging";

    let log_level = store.add_type(MEL, "LogLevel", TypeKind::Enum, Vec::new());
    for (name, value) in LOG_LEVELS {
        store.add_field(FieldSymbol {
            id: FieldId(0),
            name: (*name).to_string(),
            containing: log_level,
            ty: TypeRef::named(log_level),
            is_static: true,
            is_const: true,
            is_enum_member: true,
            const_value: Some(ConstValue::Enum {
                ty: log_level,
                member: (*name).to_string(),
                value: *value,
            }),
        });
    }

    let event_id = store.add_type(MEL, "EventId", TypeKind::Struct, Vec::new());
    property(store, event_id, "Id", TypeRef::named(int32));
    property(store, event_id, "Name", TypeRef::Nullable(Box::new(TypeRef::named(string_))));

    let ilogger = store.add_type(MEL, "ILogger", TypeKind::Interface, Vec::new());
    let nullable_exception = TypeRef::Nullable(Box::new(TypeRef::named(exception)));
    method(
        store,
        ilogger,
        "Log",
        &["TState"],
        vec![
            p("logLevel", TypeRef::named(log_level)),
            p("eventId", TypeRef::named(event_id)),
            p("state", TypeRef::TypeParam("TState".into())),
            p("exception", nullable_exception.clone()),
            p(
                "formatter",
                TypeRef::generic(
                    funcs[2],
                    vec![
                        TypeRef::TypeParam("TState".into()),
                        nullable_exception.clone(),
                        TypeRef::named(string_),
                    ],
                ),
            ),
        ],
        TypeRef::named(void_),
        false,
    );
    method(
        store,
        ilogger,
        "IsEnabled",
        &[],
        vec![p("logLevel", TypeRef::named(log_level))],
        TypeRef::named(bool_),
        false,
    );
    method(
        store,
        ilogger,
        "BeginScope",
        &["TState"],
        vec![p("state", TypeRef::TypeParam("TState".into()))],
        TypeRef::named(idisposable),
        false,
    );

    let ilogger_1 = store.add_type(MEL, "ILogger", TypeKind::Interface, vec!["TCategoryName".into()]);
    store.type_symbol_mut(ilogger_1).base_types = vec![TypeRef::named(ilogger)];

    // LoggerExtensions: the Log<Level> helper family.
    let logger_extensions = store.add_type(MEL, "LoggerExtensions", TypeKind::Class, Vec::new());
    store.type_symbol_mut(logger_extensions).is_static = true;
    store.extension_classes.push(logger_extensions);
    {
        let this_logger = || p_this("logger", TypeRef::named(ilogger));
        let message = || p("message", TypeRef::named(string_));
        let args = || {
            p_params(
                "args",
                TypeRef::Array(Box::new(TypeRef::Nullable(Box::new(TypeRef::named(object))))),
            )
        };
        let mut helpers: Vec<(String, Vec<ParamSymbol>)> = Vec::new();
        for (level, _) in LOG_LEVELS.iter().filter(|(n, _)| *n != "None") {
            let name = format!("Log{level}");
            helpers.push((name.clone(), vec![this_logger(), message(), args()]));
            helpers.push((
                name.clone(),
                vec![
                    this_logger(),
                    p("eventId", TypeRef::named(event_id)),
                    message(),
                    args(),
                ],
            ));
            helpers.push((
                name.clone(),
                vec![
                    this_logger(),
                    p("exception", nullable_exception.clone()),
                    message(),
                    args(),
                ],
            ));
            helpers.push((
                name,
                vec![
                    this_logger(),
                    p("eventId", TypeRef::named(event_id)),
                    p("exception", nullable_exception.clone()),
                    message(),
                    args(),
                ],
            ));
        }
        let level_param = || p("logLevel", TypeRef::named(log_level));
        helpers.push(("Log".into(), vec![this_logger(), level_param(), message(), args()]));
        helpers.push((
            "Log".into(),
            vec![
                this_logger(),
                level_param(),
                p("eventId", TypeRef::named(event_id)),
                message(),
                args(),
            ],
        ));
        helpers.push((
            "Log".into(),
            vec![
                this_logger(),
                level_param(),
                p("exception", nullable_exception.clone()),
                message(),
                args(),
            ],
        ));
        helpers.push((
            "Log".into(),
            vec![
                this_logger(),
                level_param(),
                p("eventId", TypeRef::named(event_id)),
                p("exception", nullable_exception.clone()),
                message(),
                args(),
            ],
        ));
        helpers.push((
            "BeginScope".into(),
            vec![this_logger(), p("messageFormat", TypeRef::named(string_)), args()],
        ));
        for (name, params) in helpers {
            let ret = if name == "BeginScope" {
                TypeRef::named(idisposable)
            } else {
                TypeRef::named(void_)
            };
            method(store, logger_extensions, &name, &[], params, ret, true);
        }
    }

    // LoggerMessage: the Define delegate factories.
    let logger_message = store.add_type(MEL, "LoggerMessage", TypeKind::Class, Vec::new());
    store.type_symbol_mut(logger_message).is_static = true;
    for arity in 0..=6usize {
        let tparams: Vec<String> = (1..=arity).map(|i| format!("T{i}")).collect();
        let tparam_refs: Vec<&str> = tparams.iter().map(|s| s.as_str()).collect();

        let mut action_args = vec![TypeRef::named(ilogger)];
        action_args.extend(tparams.iter().map(|n| TypeRef::TypeParam(n.clone())));
        action_args.push(nullable_exception.clone());
        let define_ret = TypeRef::generic(actions[arity + 2], action_args);
        method(
            store,
            logger_message,
            "Define",
            &tparam_refs,
            vec![
                p("logLevel", TypeRef::named(log_level)),
                p("eventId", TypeRef::named(event_id)),
                p("formatString", TypeRef::named(string_)),
            ],
            define_ret,
            true,
        );

        let mut func_args = vec![TypeRef::named(ilogger)];
        func_args.extend(tparams.iter().map(|n| TypeRef::TypeParam(n.clone())));
        func_args.push(TypeRef::named(idisposable));
        let scope_ret = TypeRef::generic(funcs[arity + 1], func_args);
        method(
            store,
            logger_message,
            "DefineScope",
            &tparam_refs,
            vec![p("formatString", TypeRef::named(string_))],
            scope_ret,
            true,
        );
    }

    // Compile-time logging declaration and enrichment attributes.
    let attr_class = |store: &mut SymbolStore, ns: &str, name: &str| {
        let id = store.add_type(ns, name, TypeKind::Class, Vec::new());
        store.type_symbol_mut(id).base_types = vec![TypeRef::named(attribute)];
        id
    };
    let logger_message_attribute = attr_class(store, MEL, "LoggerMessageAttribute");
    let log_properties_attribute = attr_class(store, MEL, "LogPropertiesAttribute");
    let tag_provider_attribute = attr_class(store, MEL, "TagProviderAttribute");
    let tag_name_attribute = attr_class(store, MEL, "TagNameAttribute");
    let data_classification_attribute = attr_class(
        store,
        "Microsoft.Extensions.Compliance.Classification",
        "DataClassificationAttribute",
    );
    let itag_collector = store.add_type(MEL, "ITagCollector", TypeKind::Interface, Vec::new());
    method(
        store,
        itag_collector,
        "Add",
        &[],
        vec![
            p("tagName", TypeRef::named(string_)),
            p_default("tagValue", TypeRef::Nullable(Box::new(TypeRef::named(object)))),
        ],
        TypeRef::named(void_),
        false,
    );

    Corlib {
        object,
        string_,
        bool_,
        char_,
        byte,
        sbyte,
        int16,
        uint16,
        int32,
        uint32,
        int64,
        uint64,
        float,
        double,
        decimal,
        void_,
        exception,
        type_,
        nullable,
        idisposable,
        datetime,
        datetimeoffset,
        timespan,
        guid,
        uri,
        attribute,
        task,
        task_1,
        ienumerable_1,
        list_1,
        dictionary_2,
        kvp_2,
        actions,
        funcs,
        ilogger,
        ilogger_1,
        log_level,
        event_id,
        logger_extensions,
        logger_message,
        logger_message_attribute,
        log_properties_attribute,
        tag_provider_attribute,
        tag_name_attribute,
        itag_collector,
        data_classification_attribute,
    }
}
