//! C declaration parser for external transform routines.
//!
//! A registration names the C prototype of the routine it calls, e.g.
//! `const char* do_slugify(char* x)`. The prototype is parsed here and
//! checked against the only shape the bridge can call safely: one
//! character-pointer argument in, one character pointer out.

use crate::error::{FfiError, Result};

/// A C type, limited to what can appear in a transform prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CType {
    Void,
    Char,
    SignedChar,
    UnsignedChar,
    Int,
    Long,
    SizeT,
    /// Pointer to another type.
    Pointer(Box<CType>),
    /// Const-qualified type.
    Const(Box<CType>),
}

impl CType {
    /// Strip const qualifiers from the outer level.
    pub fn strip_const(&self) -> &CType {
        match self {
            CType::Const(inner) => inner.strip_const(),
            other => other,
        }
    }

    /// Whether this is `char*`, `const char*`, or an unsigned/signed variant.
    pub fn is_char_pointer(&self) -> bool {
        match self.strip_const() {
            CType::Pointer(inner) => matches!(
                inner.strip_const(),
                CType::Char | CType::SignedChar | CType::UnsignedChar
            ),
            _ => false,
        }
    }
}

impl std::fmt::Display for CType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CType::Void => write!(f, "void"),
            CType::Char => write!(f, "char"),
            CType::SignedChar => write!(f, "signed char"),
            CType::UnsignedChar => write!(f, "unsigned char"),
            CType::Int => write!(f, "int"),
            CType::Long => write!(f, "long"),
            CType::SizeT => write!(f, "size_t"),
            CType::Pointer(inner) => write!(f, "{inner}*"),
            CType::Const(inner) => write!(f, "const {inner}"),
        }
    }
}

/// A parsed C function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CParam {
    pub param_type: CType,
    /// May be empty if unnamed.
    pub name: String,
}

/// A parsed C function prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSignature {
    pub return_type: CType,
    pub name: String,
    pub parameters: Vec<CParam>,
    pub is_variadic: bool,
}

impl CSignature {
    /// Parse a prototype such as `"const char* do_slugify(char* x)"`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim().trim_end_matches(';').trim_end();
        if input.is_empty() {
            return Err(invalid("empty signature"));
        }

        let open = input.find('(').ok_or_else(|| invalid("missing '('"))?;
        if !input.ends_with(')') {
            return Err(invalid("missing ')'"));
        }

        let head = tokenize(&input[..open]);
        let (return_type, name) = parse_declarator(&head)?;
        if name.is_empty() {
            return Err(invalid("missing function name"));
        }
        if !is_c_identifier(&name) {
            return Err(invalid(&format!("'{name}' is not a valid C identifier")));
        }

        let (parameters, is_variadic) = parse_params(&input[open + 1..input.len() - 1])?;

        Ok(CSignature {
            return_type,
            name,
            parameters,
            is_variadic,
        })
    }

    /// Check that this prototype can back a bridged text transform.
    pub fn check_string_transform(&self) -> Result<()> {
        if self.is_variadic {
            return Err(invalid(&format!("'{}' must not be variadic", self.name)));
        }
        if !self.return_type.is_char_pointer() {
            return Err(invalid(&format!(
                "'{}' must return a character pointer, not '{}'",
                self.name, self.return_type
            )));
        }
        match self.parameters.as_slice() {
            [param] if param.param_type.is_char_pointer() => Ok(()),
            [param] => Err(invalid(&format!(
                "'{}' must take a character pointer, not '{}'",
                self.name, param.param_type
            ))),
            params => Err(invalid(&format!(
                "'{}' must take exactly one parameter, found {}",
                self.name,
                params.len()
            ))),
        }
    }
}

impl std::fmt::Display for CSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.param_type)?;
            if !param.name.is_empty() {
                write!(f, " {}", param.name)?;
            }
        }
        if self.is_variadic {
            if !self.parameters.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...")?;
        }
        write!(f, ")")
    }
}

/// Whether `s` is a valid C identifier (and therefore a loadable symbol name).
pub fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn invalid(detail: &str) -> FfiError {
    FfiError::InvalidCSignature {
        detail: detail.to_string(),
    }
}

/// Split on whitespace, keeping `*` as its own token.
fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for part in s.split_whitespace() {
        let mut rest = part;
        while let Some(star) = rest.find('*') {
            if star > 0 {
                tokens.push(&rest[..star]);
            }
            tokens.push("*");
            rest = &rest[star + 1..];
        }
        if !rest.is_empty() {
            tokens.push(rest);
        }
    }
    tokens
}

/// Parse `[const] base [*|const]... [name]`.
fn parse_declarator(tokens: &[&str]) -> Result<(CType, String)> {
    let mut pos = 0;
    let mut is_const = false;
    if tokens.first() == Some(&"const") {
        is_const = true;
        pos += 1;
    }

    let base = match tokens.get(pos..) {
        Some(["signed", "char", ..]) => {
            pos += 2;
            CType::SignedChar
        }
        Some(["unsigned", "char", ..]) => {
            pos += 2;
            CType::UnsignedChar
        }
        Some([word, ..]) => {
            pos += 1;
            match *word {
                "void" => CType::Void,
                "char" => CType::Char,
                "int" => CType::Int,
                "long" => CType::Long,
                "size_t" => CType::SizeT,
                other => return Err(invalid(&format!("unsupported type '{other}'"))),
            }
        }
        _ => return Err(invalid("expected type")),
    };

    let mut ty = if is_const || tokens.get(pos) == Some(&"const") {
        if !is_const {
            pos += 1;
        }
        CType::Const(Box::new(base))
    } else {
        base
    };

    let mut name = String::new();
    for tok in &tokens[pos..] {
        match *tok {
            "*" => ty = CType::Pointer(Box::new(ty)),
            // `char* const p` qualifies the pointer itself; it does not
            // change what the callee may write through it.
            "const" => {}
            ident if name.is_empty() && is_c_identifier(ident) => name = ident.to_string(),
            extra => return Err(invalid(&format!("unexpected token '{extra}'"))),
        }
    }

    Ok((ty, name))
}

fn parse_params(s: &str) -> Result<(Vec<CParam>, bool)> {
    let s = s.trim();
    if s.is_empty() || s == "void" {
        return Ok((Vec::new(), false));
    }

    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let mut params = Vec::new();
    let mut is_variadic = false;

    for (i, part) in parts.iter().enumerate() {
        if *part == "..." {
            if i != parts.len() - 1 {
                return Err(invalid("'...' must be the last parameter"));
            }
            is_variadic = true;
            continue;
        }
        let (param_type, name) = parse_declarator(&tokenize(part))?;
        params.push(CParam { param_type, name });
    }

    Ok((params, is_variadic))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_ptr() -> CType {
        CType::Pointer(Box::new(CType::Char))
    }

    fn const_char_ptr() -> CType {
        CType::Pointer(Box::new(CType::Const(Box::new(CType::Char))))
    }

    #[test]
    fn parse_slugify_prototype() {
        let sig = CSignature::parse("const char* do_slugify(char* x)").unwrap();
        assert_eq!(sig.name, "do_slugify");
        assert_eq!(sig.return_type, const_char_ptr());
        assert_eq!(sig.parameters.len(), 1);
        assert_eq!(sig.parameters[0].param_type, char_ptr());
        assert_eq!(sig.parameters[0].name, "x");
        assert!(sig.check_string_transform().is_ok());
    }

    #[test]
    fn parse_spacing_variants() {
        for src in [
            "const char *do_slugify(char *x)",
            "const char * do_slugify ( char * x )",
            "char const* do_slugify(char*);",
        ] {
            let sig = CSignature::parse(src).unwrap();
            assert_eq!(sig.name, "do_slugify", "{src}");
            assert!(sig.check_string_transform().is_ok(), "{src}");
        }
    }

    #[test]
    fn unsigned_char_pointer_accepted() {
        let sig = CSignature::parse("unsigned char* f(const unsigned char* s)").unwrap();
        assert!(sig.check_string_transform().is_ok());
    }

    #[test]
    fn display_round_trips_shape() {
        let sig = CSignature::parse("const char* do_slugify(char* x)").unwrap();
        assert_eq!(sig.to_string(), "const char* do_slugify(char* x)");
    }

    #[test]
    fn rejects_wrong_return_type() {
        let sig = CSignature::parse("int do_slugify(char* x)").unwrap();
        let err = sig.check_string_transform().unwrap_err();
        assert!(err.to_string().contains("must return"));
    }

    #[test]
    fn rejects_wrong_arity() {
        let sig = CSignature::parse("char* f(char* a, size_t n)").unwrap();
        assert!(sig.check_string_transform().is_err());
        let sig = CSignature::parse("char* f(void)").unwrap();
        assert!(sig.check_string_transform().is_err());
    }

    #[test]
    fn rejects_variadic() {
        let sig = CSignature::parse("char* f(char* fmt, ...)").unwrap();
        assert!(sig.is_variadic);
        assert!(sig.check_string_transform().is_err());
    }

    #[test]
    fn rejects_non_pointer_param() {
        let sig = CSignature::parse("char* f(int x)").unwrap();
        assert!(sig.check_string_transform().is_err());
    }

    #[test]
    fn parse_errors() {
        assert!(CSignature::parse("").is_err());
        assert!(CSignature::parse("char* f char* x").is_err());
        assert!(CSignature::parse("widget* f(char* x)").is_err());
        assert!(CSignature::parse("char* (char* x)").is_err());
        assert!(CSignature::parse("char* 9f(char* x)").is_err());
        assert!(CSignature::parse("char* f(..., char* x)").is_err());
    }

    #[test]
    fn rejects_array_declarators() {
        let err = CSignature::parse("char* f(char* x[10])").unwrap_err();
        assert!(err.to_string().contains("unexpected token 'x[10]'"));
        assert!(CSignature::parse("char* f(char* x[])").is_err());
        assert!(CSignature::parse("char* f(char* 1x)").is_err());
    }

    #[test]
    fn identifiers() {
        assert!(is_c_identifier("do_slugify"));
        assert!(is_c_identifier("_x1"));
        assert!(!is_c_identifier("1x"));
        assert!(!is_c_identifier("a-b"));
        assert!(!is_c_identifier(""));
    }
}
