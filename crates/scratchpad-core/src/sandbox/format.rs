//! String form of values passed to `console.*`

use boa_engine::{Context, JsResult, JsValue, js_string};

const JSON_INDENT: i32 = 2;

/// Format every argument and join them with a single space
pub fn format_args(args: &[JsValue], context: &mut Context) -> String {
    args.iter()
        .map(|value| format_value(value, context))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format one value the way the capture buffer records it
///
/// `null` and `undefined` are spelled out, plain objects and arrays are
/// pretty-printed as JSON, everything else uses its string conversion.
/// Objects that cannot be serialized (cycles, throwing `toJSON`) fall back to
/// their string conversion.
pub fn format_value(value: &JsValue, context: &mut Context) -> String {
    if value.is_null() {
        return "null".to_string();
    }
    if value.is_undefined() {
        return "undefined".to_string();
    }

    if value.is_object() && !value.is_callable() {
        match pretty_json(value, context) {
            Ok(Some(json)) => return json,
            Ok(None) => {}
            Err(err) => tracing::debug!(%err, "falling back to string conversion"),
        }
    }

    string_conversion(value, context)
}

// JSON.stringify(value, null, 2), as the page would print it. `None` when
// stringify yields undefined.
fn pretty_json(value: &JsValue, context: &mut Context) -> JsResult<Option<String>> {
    let json = context.global_object().get(js_string!("JSON"), context)?;
    let Some(json_object) = json.as_object() else {
        return Ok(None);
    };

    let stringify = json_object.get(js_string!("stringify"), context)?;
    let Some(stringify) = stringify.as_callable() else {
        return Ok(None);
    };

    let out = stringify.call(
        &json,
        &[value.clone(), JsValue::null(), JsValue::from(JSON_INDENT)],
        context,
    )?;

    Ok(out.as_string().map(|s| s.to_std_string_escaped()))
}

pub(super) fn string_conversion(value: &JsValue, context: &mut Context) -> String {
    match value.to_string(context) {
        Ok(s) => s.to_std_string_escaped(),
        Err(_) => value.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::Source;
    use pretty_assertions::assert_eq;

    fn eval_and_format(expr: &str) -> String {
        let mut context = Context::default();
        let value = context.eval(Source::from_bytes(expr)).unwrap();
        format_value(&value, &mut context)
    }

    #[test]
    fn null_and_undefined_are_spelled_out() {
        assert_eq!(eval_and_format("null"), "null");
        assert_eq!(eval_and_format("undefined"), "undefined");
    }

    #[test]
    fn scalars_use_string_conversion() {
        assert_eq!(eval_and_format("42"), "42");
        assert_eq!(eval_and_format("0.1 + 0.2"), "0.30000000000000004");
        assert_eq!(eval_and_format("'text'"), "text");
        assert_eq!(eval_and_format("true"), "true");
        assert_eq!(eval_and_format("10n ** 20n"), "100000000000000000000");
    }

    #[test]
    fn objects_are_pretty_json() {
        assert_eq!(eval_and_format("({a: 1})"), "{\n  \"a\": 1\n}");
        assert_eq!(eval_and_format("[1, 2]"), "[\n  1,\n  2\n]");
        assert_eq!(eval_and_format("[]"), "[]");
    }

    #[test]
    fn cyclic_object_falls_back_to_string() {
        assert_eq!(
            eval_and_format("(() => { const o = {}; o.self = o; return o; })()"),
            "[object Object]"
        );
    }

    #[test]
    fn functions_are_not_serialized() {
        let formatted = eval_and_format("(function add(a, b) { return a + b; })");
        assert!(formatted.contains("add"), "got {formatted}");
    }

    #[test]
    fn arguments_are_space_joined() {
        let mut context = Context::default();
        let args = [JsValue::from(1), JsValue::null(), JsValue::from(js_string!("x"))];
        assert_eq!(format_args(&args, &mut context), "1 null x");
        assert_eq!(format_args(&[], &mut context), "");
    }
}
