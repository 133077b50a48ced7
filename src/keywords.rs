/// Vala keyword table.
///
/// Each keyword lists the scope kinds it is offered in and the snippet
/// inserted when it is accepted.  The table is plain data; the server uses
/// [`default_keywords`] unless a different table is injected with
/// [`Backend::with_keywords`](crate::Backend::with_keywords).
use crate::types::ScopeKind;
use crate::types::ScopeKind::{
    Block, Class, Constructor, Enum, Global, Interface, Method, Namespace, Property, Struct,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub name: String,
    /// Scope kinds in which the keyword is offered.
    pub scopes: Vec<ScopeKind>,
    /// Snippet inserted on acceptance (`$1`, `${1:name}` placeholders).
    pub snippet: String,
}

impl Keyword {
    pub fn new(name: &str, scopes: &[ScopeKind], snippet: &str) -> Self {
        Self {
            name: name.to_string(),
            scopes: scopes.to_vec(),
            snippet: snippet.to_string(),
        }
    }

    pub fn applies_to(&self, kind: ScopeKind) -> bool {
        self.scopes.contains(&kind)
    }
}

const BODIES: &[ScopeKind] = &[Method, Constructor, Block];
const TYPE_BODIES: &[ScopeKind] = &[Class, Interface, Struct];
const MEMBER_CONTAINERS: &[ScopeKind] = &[Global, Namespace, Class, Interface, Struct, Enum];
const DECLARATION_CONTAINERS: &[ScopeKind] = &[Global, Namespace];

/// The built-in keyword table, in the order keywords are offered.
pub fn default_keywords() -> Vec<Keyword> {
    vec![
        // Declarations
        Keyword::new("using", &[Global], "using ${1:GLib};"),
        Keyword::new("namespace", DECLARATION_CONTAINERS, "namespace ${1:Name} {\n\t$0\n}"),
        Keyword::new(
            "class",
            DECLARATION_CONTAINERS,
            "class ${1:Name} : ${2:Object} {\n\t$0\n}",
        ),
        Keyword::new("interface", DECLARATION_CONTAINERS, "interface ${1:Name} {\n\t$0\n}"),
        Keyword::new("struct", DECLARATION_CONTAINERS, "struct ${1:Name} {\n\t$0\n}"),
        Keyword::new("enum", DECLARATION_CONTAINERS, "enum ${1:Name} {\n\t$0\n}"),
        Keyword::new("errordomain", DECLARATION_CONTAINERS, "errordomain ${1:Name} {\n\t$0\n}"),
        Keyword::new("delegate", MEMBER_CONTAINERS, "delegate ${1:void} ${2:Name} ($3);"),
        // Modifiers
        Keyword::new("public", MEMBER_CONTAINERS, "public "),
        Keyword::new("private", MEMBER_CONTAINERS, "private "),
        Keyword::new("protected", TYPE_BODIES, "protected "),
        Keyword::new("internal", MEMBER_CONTAINERS, "internal "),
        Keyword::new("static", MEMBER_CONTAINERS, "static "),
        Keyword::new("abstract", TYPE_BODIES, "abstract "),
        Keyword::new("virtual", TYPE_BODIES, "virtual "),
        Keyword::new("override", TYPE_BODIES, "override "),
        Keyword::new("async", MEMBER_CONTAINERS, "async "),
        Keyword::new("const", &[Global, Namespace, Class, Struct, Method, Constructor, Block], "const "),
        Keyword::new("signal", &[Class, Interface], "signal void ${1:name} ($2);"),
        Keyword::new("construct", &[Class, Property], "construct {\n\t$0\n}"),
        Keyword::new("get", &[Property], "get { return ${1:value}; }"),
        Keyword::new("set", &[Property], "set { ${1:field} = value; }"),
        Keyword::new("default", &[Property], "default = ${1:value};"),
        Keyword::new("owned", &[Class, Interface, Struct, Property, Method, Block], "owned "),
        Keyword::new("unowned", &[Class, Interface, Struct, Method, Constructor, Block], "unowned "),
        // Statements
        Keyword::new("var", BODIES, "var ${1:name} = $0;"),
        Keyword::new("if", BODIES, "if (${1:condition}) {\n\t$0\n}"),
        Keyword::new("else", BODIES, "else {\n\t$0\n}"),
        Keyword::new("for", BODIES, "for (int ${1:i} = 0; $1 < ${2:count}; $1++) {\n\t$0\n}"),
        Keyword::new("foreach", BODIES, "foreach (${1:var} ${2:item} in ${3:collection}) {\n\t$0\n}"),
        Keyword::new("while", BODIES, "while (${1:condition}) {\n\t$0\n}"),
        Keyword::new("do", BODIES, "do {\n\t$0\n} while (${1:condition});"),
        Keyword::new("switch", BODIES, "switch (${1:value}) {\n\tcase ${2:0}:\n\t\t$0\n\t\tbreak;\n}"),
        Keyword::new("case", BODIES, "case ${1:value}:"),
        Keyword::new("break", BODIES, "break;"),
        Keyword::new("continue", BODIES, "continue;"),
        Keyword::new("return", &[Method, Block, Property], "return $0;"),
        Keyword::new("try", BODIES, "try {\n\t$1\n} catch (${2:Error} ${3:e}) {\n\t$0\n}"),
        Keyword::new("catch", BODIES, "catch (${1:Error} ${2:e}) {\n\t$0\n}"),
        Keyword::new("finally", BODIES, "finally {\n\t$0\n}"),
        Keyword::new("throw", BODIES, "throw new ${1:Error} ($0);"),
        Keyword::new("lock", BODIES, "lock (${1:resource}) {\n\t$0\n}"),
        Keyword::new("yield", &[Method, Block], "yield "),
        Keyword::new("new", BODIES, "new ${1:Type} ($0)"),
        Keyword::new("delete", BODIES, "delete ${1:pointer};"),
        Keyword::new("this", &[Method, Constructor, Block, Property], "this"),
        Keyword::new("base", &[Method, Constructor, Block, Property], "base"),
        Keyword::new("null", BODIES, "null"),
        Keyword::new("true", BODIES, "true"),
        Keyword::new("false", BODIES, "false"),
        Keyword::new("typeof", BODIES, "typeof (${1:Type})"),
        Keyword::new("sizeof", BODIES, "sizeof (${1:Type})"),
        Keyword::new("is", BODIES, "is "),
        Keyword::new("as", BODIES, "as "),
        Keyword::new("in", BODIES, "in "),
        Keyword::new("out", &[Method, Constructor, Block], "out "),
        Keyword::new("ref", &[Method, Constructor, Block], "ref "),
    ]
}
