//! Parsed type trees and their surface rendering.

use std::fmt;

use rustc_hash::FxHashSet;

/// Legacy `typing` aliases rendered in their lowercase builtin spelling.
pub const TYPING_LOWER: [&str; 6] = ["List", "Set", "Type", "Dict", "Tuple", "Overload"];

/// Name of the synthetic `key: value` pairing used for dict-literal defaults.
pub const DICT_ITEM: &str = ":";

/// Modules whose qualification is dropped when rendering.
const REDUCED_MODULES: [&str; 2] = ["typing", "mypy_extensions"];

/// A parsed type.
///
/// Empty `args` is a bare name (`int`, `Any`). Otherwise the value is a
/// generic application (`list[int]`), a union (name `Union`), a bare
/// bracketed list (empty name, as in the parameter list of `Callable`), or a
/// dict item (name [`DICT_ITEM`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeValue {
    pub name: String,
    pub args: Vec<TypeValue>,
}

impl TypeValue {
    /// A bare name.
    pub fn leaf(name: impl Into<String>) -> Self {
        TypeValue {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn new(name: impl Into<String>, args: Vec<TypeValue>) -> Self {
        TypeValue {
            name: name.into(),
            args,
        }
    }

    pub fn union(args: Vec<TypeValue>) -> Self {
        TypeValue::new("Union", args)
    }

    /// `Optional[inner]`, spelled as `inner | None`.
    pub fn optional(inner: TypeValue) -> Self {
        TypeValue::union(vec![inner, TypeValue::leaf("None")])
    }

    pub fn dict_item(key: TypeValue, value: TypeValue) -> Self {
        TypeValue::new(DICT_ITEM, vec![key, value])
    }

    pub fn is_leaf(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Display for TypeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TypeRenderer::default().render(self))
    }
}

/// Turns `TypeValue` trees back into source text.
///
/// Names qualified by `typing` or `mypy_extensions` lose the module, and the
/// legacy capitalised aliases in [`TYPING_LOWER`] are lowercased. Modules in
/// `ignore_modules` (normally the module being annotated) are stripped first.
#[derive(Clone, Debug, Default)]
pub struct TypeRenderer {
    ignore_modules: FxHashSet<String>,
}

impl TypeRenderer {
    pub fn new(ignore_modules: FxHashSet<String>) -> Self {
        TypeRenderer { ignore_modules }
    }

    pub fn ignore_modules(&self) -> &FxHashSet<String> {
        &self.ignore_modules
    }

    pub fn render(&self, value: &TypeValue) -> String {
        let mut out = String::new();
        self.render_into(value, &mut out);
        out
    }

    fn render_into(&self, value: &TypeValue, out: &mut String) {
        let name = self.display_name(&value.name);
        if value.args.is_empty() {
            if name.is_empty() {
                out.push_str("[]");
            } else {
                out.push_str(&name);
            }
            return;
        }
        let joiner = match name.as_str() {
            "Union" => " | ",
            DICT_ITEM => ": ",
            _ => {
                out.push_str(&name);
                out.push('[');
                self.render_list(&value.args, ", ", out);
                out.push(']');
                return;
            }
        };
        self.render_list(&value.args, joiner, out);
    }

    fn render_list(&self, args: &[TypeValue], joiner: &str, out: &mut String) {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(joiner);
            }
            self.render_into(arg, out);
        }
    }

    /// Display spelling of a single (possibly dotted) name.
    pub fn display_name(&self, name: &str) -> String {
        let name = match name.split_once('.') {
            Some((module, rest)) if self.ignore_modules.contains(module) => rest,
            _ => name,
        };
        let name = reduce_typing(name);
        if TYPING_LOWER.contains(&name) {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }
}

/// Drop a leading `typing.` / `mypy_extensions.` qualifier.
///
/// Both `.` and `:` are accepted as the module separator.
fn reduce_typing(name: &str) -> &str {
    for separator in ['.', ':'] {
        if let Some((module, text)) = name.split_once(separator) {
            if REDUCED_MODULES.contains(&module) {
                return text;
            }
        }
    }
    name
}
