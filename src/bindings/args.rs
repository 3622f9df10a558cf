//! Parameter list translation.
//!
//! Turns the parameter text of a declaration into the parameter list of the
//! wrapper and the argument list it forwards to the original function.

/// Result of translating a declaration's parameter text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedArgs {
    /// Parameter list for the wrapper signature
    pub params: String,
    /// Argument list for the forwarded call
    pub call_args: String,
}

/// Name given to an unnamed parameter at `position`.
///
/// Positions are counted over the raw comma split, so names stay stable
/// however many unnamed parameters a declaration has.
pub fn placeholder_name(position: usize) -> String {
    format!("arg{}", position)
}

/// Translate a raw parameter list such as `VipsImage *in, VipsImage **out`.
pub fn translate(param_text: &str) -> TranslatedArgs {
    let param_text = param_text.trim();
    if param_text.is_empty() {
        return TranslatedArgs::default();
    }

    let mut params = Vec::new();
    let mut call_args = Vec::new();

    for (position, param) in param_text.split(',').enumerate() {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }

        if param == "void" {
            params.push("void".to_string());
            continue;
        }

        let (ty, name) = split_param(param, position);
        call_args.push(bare_identifier(&name));
        params.push(format!("{} {}", ty, name));
    }

    TranslatedArgs {
        params: params.join(", "),
        call_args: call_args.join(", "),
    }
}

/// Split a parameter into its type and declarator name.
///
/// The last whitespace-separated token is the name. A lone token is a type
/// without a name, and a lone `*` is an unnamed pointer; both get a
/// placeholder.
fn split_param(param: &str, position: usize) -> (String, String) {
    let mut tokens: Vec<&str> = param.split_whitespace().collect();
    let last = tokens.pop().unwrap_or_default();

    if tokens.is_empty() {
        return (last.to_string(), placeholder_name(position));
    }

    let ty = tokens.join(" ");
    if last == "*" {
        (ty, format!("* {}", placeholder_name(position)))
    } else {
        (ty, last.to_string())
    }
}

/// Strip pointer markers and array brackets from a declarator name.
fn bare_identifier(name: &str) -> String {
    let name = match name.find('[') {
        Some(bracket) => &name[..bracket],
        None => name,
    };
    name.replace('*', "").trim().to_string()
}
