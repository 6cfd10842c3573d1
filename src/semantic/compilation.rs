use crate::errors::ParseError;
use crate::parser::Parser;
use crate::semantic::binder::{self, SemanticModel};
use crate::semantic::corlib::{self, Corlib};
use crate::semantic::declare;
use crate::semantic::symbols::{
    ConstValue, FieldId, FieldSymbol, MethodId, MethodSymbol, PropertyId, PropertySymbol,
    SymbolId, SymbolStore, TypeRef, TypeSymbol,
};
use crate::span::TextSpan;
use crate::syntax::declarations::MethodDeclaration;
use crate::syntax::unit::CompilationUnit;
use std::collections::HashMap;
use std::sync::OnceLock;

/// One parsed source file.
#[derive(Debug)]
pub struct SyntaxTree {
    pub file_path: String,
    pub source: String,
    pub root: CompilationUnit,
    line_starts: Vec<usize>,
}

impl SyntaxTree {
    pub fn new(file_path: impl Into<String>, source: impl Into<String>, root: CompilationUnit) -> Self {
        let source = source.into();
        let line_starts = compute_line_starts(&source);
        Self {
            file_path: file_path.into(),
            source,
            root,
            line_starts,
        }
    }

    /// Map a byte offset to a 1-based (line, column) pair, clamping past
    /// the end of the source.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line_idx).copied().unwrap_or(0);
        (line_idx + 1, offset - line_start + 1)
    }

    pub fn text(&self, span: TextSpan) -> &str {
        span.slice(&self.source)
    }
}

// 0-based byte offsets where each line starts.
fn compute_line_starts(src: &str) -> Vec<usize> {
    let mut starts = vec![0usize];
    for (i, b) in src.as_bytes().iter().enumerate() {
        if *b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// How a source type may convert to a parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Conversion {
    None,
    Implicit,
    Identity,
}

/// Which assembly references the compilation is seeded with.
#[derive(Debug, Clone)]
pub struct CompilationOptions {
    /// Seed the `Microsoft.Extensions.*` logging surface. Disabled, the
    /// compilation models a project that never linked the logging API.
    pub reference_logging_api: bool,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            reference_logging_api: true,
        }
    }
}

/// An immutable bundle of syntax trees and resolved symbols.
pub struct Compilation {
    trees: Vec<SyntaxTree>,
    pub(crate) store: SymbolStore,
    pub(crate) corlib: Corlib,
    pub(crate) declared_methods: HashMap<(usize, TextSpan), MethodId>,
    models: Vec<OnceLock<SemanticModel>>,
}

impl Compilation {
    /// Parse and bind a set of `(file path, source)` pairs.
    pub fn parse<I, P, S>(sources: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: Into<String>,
    {
        Self::parse_with_options(sources, CompilationOptions::default())
    }

    pub fn parse_with_options<I, P, S>(
        sources: I,
        options: CompilationOptions,
    ) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: Into<String>,
    {
        let parser = Parser::new();
        let mut trees = Vec::new();
        for (path, source) in sources {
            let path = path.into();
            let source = source.into();
            let root = parser.parse(&path, &source)?;
            trees.push(SyntaxTree::new(path, source, root));
        }
        Ok(Self::from_trees_with_options(trees, options))
    }

    pub fn from_trees(trees: Vec<SyntaxTree>) -> Self {
        Self::from_trees_with_options(trees, CompilationOptions::default())
    }

    pub fn from_trees_with_options(trees: Vec<SyntaxTree>, options: CompilationOptions) -> Self {
        let mut store = SymbolStore::default();
        let corlib = corlib::seed(&mut store);
        if !options.reference_logging_api {
            // An unreferenced assembly resolves neither for user code nor
            // for the analyzer's registry.
            store
                .by_metadata_name
                .retain(|name, _| !name.starts_with("Microsoft.Extensions."));
            store
                .namespaces
                .retain(|ns| !ns.starts_with("Microsoft.Extensions") && ns != "Microsoft");
            let kept: Vec<_> = store
                .extension_classes
                .iter()
                .copied()
                .filter(|id| !store.types[id.0 as usize].namespace.starts_with("Microsoft.Extensions"))
                .collect();
            store.extension_classes = kept;
        }
        let declared_methods = declare::declare_units(&mut store, &corlib, &trees);
        let models = (0..trees.len()).map(|_| OnceLock::new()).collect();
        Self {
            trees,
            store,
            corlib,
            declared_methods,
            models,
        }
    }

    pub fn trees(&self) -> &[SyntaxTree] {
        &self.trees
    }

    pub fn tree(&self, index: usize) -> &SyntaxTree {
        &self.trees[index]
    }

    /// Canonical symbol lookup by fully-qualified metadata name
    /// (`` Ns.Name`N `` for generics). This bypasses using-directive
    /// resolution, so shadowing user types never match.
    pub fn get_type_by_metadata_name(&self, name: &str) -> Option<SymbolId> {
        self.store.lookup(name)
    }

    pub fn type_symbol(&self, id: SymbolId) -> &TypeSymbol {
        self.store.type_symbol(id)
    }

    pub fn method(&self, id: MethodId) -> &MethodSymbol {
        self.store.method(id)
    }

    pub fn property(&self, id: PropertyId) -> &PropertySymbol {
        self.store.property(id)
    }

    pub fn field(&self, id: FieldId) -> &FieldSymbol {
        self.store.field(id)
    }

    /// The lazily-built semantic model for one tree.
    pub fn semantic_model(&self, tree: usize) -> &SemanticModel {
        self.models[tree].get_or_init(|| binder::bind(self, tree))
    }

    /// Symbol declared by a method declaration node in the given tree.
    pub fn declared_method(&self, tree: usize, decl: &MethodDeclaration) -> Option<MethodId> {
        self.declared_methods.get(&(tree, decl.name_span)).copied()
    }

    /// Fully-qualified display string; primitives render as keywords.
    pub fn display_type(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named { symbol, args } => {
                let sym = self.type_symbol(*symbol);
                if let Some(kw) = sym.keyword {
                    return kw.to_string();
                }
                if args.is_empty() {
                    sym.fqn()
                } else {
                    let rendered: Vec<String> = args.iter().map(|a| self.display_type(a)).collect();
                    format!("{}<{}>", sym.fqn(), rendered.join(", "))
                }
            }
            TypeRef::Array(elem) => format!("{}[]", self.display_type(elem)),
            TypeRef::Nullable(inner) => format!("{}?", self.display_type(inner)),
            TypeRef::TypeParam(name) => name.clone(),
            TypeRef::Error => "?".to_string(),
        }
    }

    /// Short display string: simple names, no namespaces.
    pub fn simple_type_name(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named { symbol, args } => {
                let sym = self.type_symbol(*symbol);
                if let Some(kw) = sym.keyword {
                    return kw.to_string();
                }
                if args.is_empty() {
                    sym.name.clone()
                } else {
                    let rendered: Vec<String> =
                        args.iter().map(|a| self.simple_type_name(a)).collect();
                    format!("{}<{}>", sym.name, rendered.join(", "))
                }
            }
            TypeRef::Array(elem) => format!("{}[]", self.simple_type_name(elem)),
            TypeRef::Nullable(inner) => format!("{}?", self.simple_type_name(inner)),
            TypeRef::TypeParam(name) => name.clone(),
            TypeRef::Error => "?".to_string(),
        }
    }

    /// Base types of an instantiated type, with type arguments substituted.
    pub(crate) fn instantiated_bases(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let TypeRef::Named { symbol, args } = ty.strip_nullable() else {
            return Vec::new();
        };
        let sym = self.type_symbol(*symbol);
        if sym.type_params.is_empty() {
            return sym.base_types.clone();
        }
        let map: HashMap<String, TypeRef> = sym
            .type_params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect();
        sym.base_types.iter().map(|b| b.substitute(&map)).collect()
    }

    /// Whether `from` is `to` or derives from / implements it.
    pub(crate) fn is_subtype(&self, from: &TypeRef, to: &TypeRef) -> bool {
        let to = to.strip_nullable();
        let mut worklist = vec![from.strip_nullable().clone()];
        let mut seen = Vec::new();
        while let Some(current) = worklist.pop() {
            if &current == to {
                return true;
            }
            if seen.contains(&current) {
                continue;
            }
            worklist.extend(self.instantiated_bases(&current));
            seen.push(current);
        }
        false
    }

    /// Conversion from an argument type to a parameter type.
    pub(crate) fn conversion(
        &self,
        from: &TypeRef,
        to: &TypeRef,
        from_const: Option<&ConstValue>,
    ) -> Conversion {
        if from == to {
            return Conversion::Identity;
        }
        if from.is_error() || to.is_error() {
            return Conversion::Implicit;
        }
        if matches!(from_const, Some(ConstValue::Null)) {
            return Conversion::Implicit;
        }
        let from_s = from.strip_nullable();
        let to_s = to.strip_nullable();
        if from_s == to_s {
            return Conversion::Identity;
        }
        // Everything converts to object.
        if to_s.is_symbol(self.corlib.object) {
            return Conversion::Implicit;
        }
        // Open generic parameters accept anything; inference narrows later.
        if matches!(to_s, TypeRef::TypeParam(_)) {
            return Conversion::Implicit;
        }
        // Numeric widening.
        if from_s.is_symbol(self.corlib.int32)
            && [
                self.corlib.int64,
                self.corlib.double,
                self.corlib.float,
                self.corlib.decimal,
            ]
            .iter()
            .any(|id| to_s.is_symbol(*id))
        {
            return Conversion::Implicit;
        }
        // EventId has an implicit conversion from int.
        if from_s.is_symbol(self.corlib.int32) && to_s.is_symbol(self.corlib.event_id) {
            return Conversion::Implicit;
        }
        if self.is_subtype(from_s, to_s) {
            return Conversion::Implicit;
        }
        if let (TypeRef::Array(from_elem), TypeRef::Array(to_elem)) = (from_s, to_s) {
            if self.conversion(from_elem, to_elem, None) != Conversion::None {
                return Conversion::Implicit;
            }
        }
        Conversion::None
    }

    /// Methods named `name` on `ty` and its bases.
    pub(crate) fn methods_named(&self, ty: SymbolId, name: &str) -> Vec<MethodId> {
        let mut out = Vec::new();
        let mut worklist = vec![TypeRef::named(ty)];
        let mut seen: Vec<SymbolId> = Vec::new();
        while let Some(current) = worklist.pop() {
            let Some(sym_id) = current.symbol() else { continue };
            if seen.contains(&sym_id) {
                continue;
            }
            seen.push(sym_id);
            let sym = self.type_symbol(sym_id);
            out.extend(
                sym.methods
                    .iter()
                    .copied()
                    .filter(|m| self.method(*m).name == name),
            );
            worklist.extend(self.instantiated_bases(&current));
        }
        out
    }

    /// Extension methods named `name` from every static extension class.
    pub(crate) fn extension_methods_named(&self, name: &str) -> Vec<MethodId> {
        let mut out = Vec::new();
        for class in &self.store.extension_classes {
            let sym = self.type_symbol(*class);
            out.extend(
                sym.methods
                    .iter()
                    .copied()
                    .filter(|m| {
                        let method = self.method(*m);
                        method.is_extension && method.name == name
                    }),
            );
        }
        out
    }

    /// Properties (then fields) named `name` on `ty` and its bases.
    pub(crate) fn member_named(&self, ty: SymbolId, name: &str) -> Option<MemberRef> {
        let mut worklist = vec![TypeRef::named(ty)];
        let mut seen: Vec<SymbolId> = Vec::new();
        while let Some(current) = worklist.pop() {
            let Some(sym_id) = current.symbol() else { continue };
            if seen.contains(&sym_id) {
                continue;
            }
            seen.push(sym_id);
            let sym = self.type_symbol(sym_id);
            if let Some(p) = sym
                .properties
                .iter()
                .find(|p| self.property(**p).name == name)
            {
                return Some(MemberRef::Property(*p));
            }
            if let Some(f) = sym.fields.iter().find(|f| self.field(**f).name == name) {
                return Some(MemberRef::Field(*f));
            }
            worklist.extend(self.instantiated_bases(&current));
        }
        None
    }

    /// Whether `ty` is (or implements) `IEnumerable<KeyValuePair<string, _>>`.
    pub(crate) fn is_kvp_enumerable(&self, ty: &TypeRef) -> bool {
        self.kvp_value_type(ty).is_some()
    }

    /// The `TValue` of the key-value pairs `ty` enumerates, when the key
    /// type is string.
    pub(crate) fn kvp_value_type(&self, ty: &TypeRef) -> Option<TypeRef> {
        let string_key = |args: &[TypeRef]| {
            args.first()
                .map(|k| k.strip_nullable().is_symbol(self.corlib.string_))
                .unwrap_or(false)
        };
        let pair_value = |elem: &TypeRef| -> Option<TypeRef> {
            match elem.strip_nullable() {
                TypeRef::Named { symbol, args }
                    if *symbol == self.corlib.kvp_2 && string_key(args) =>
                {
                    args.get(1).cloned()
                }
                _ => None,
            }
        };
        if let TypeRef::Array(elem) = ty.strip_nullable() {
            return pair_value(elem);
        }
        let mut worklist = vec![ty.strip_nullable().clone()];
        let mut seen = Vec::new();
        while let Some(current) = worklist.pop() {
            if seen.contains(&current) {
                continue;
            }
            if let TypeRef::Named { symbol, args } = &current {
                if *symbol == self.corlib.ienumerable_1 {
                    if let Some(value) = args.first().and_then(pair_value) {
                        return Some(value);
                    }
                }
            }
            worklist.extend(self.instantiated_bases(&current));
            seen.push(current);
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum MemberRef {
    Property(PropertyId),
    Field(FieldId),
}

impl std::fmt::Debug for Compilation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compilation")
            .field("trees", &self.trees.len())
            .field("types", &self.store.types.len())
            .finish()
    }
}
