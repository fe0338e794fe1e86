//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// The template is scanned once; inserted values are never rescanned, so a
/// value containing `{answer}` stays literal.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = String::with_capacity(tpl.len());
  let mut rest = tpl;
  while let Some(open) = rest.find('{') {
    out.push_str(&rest[..open]);
    let after = &rest[open + 1..];
    match after.find('}') {
      Some(close) => {
        let key = &after[..close];
        match pairs.iter().find(|(k, _)| *k == key) {
          Some((_, v)) => {
            out.push_str(v);
            rest = &after[close + 1..];
          }
          None => {
            // Keep the brace literal and resume right after it.
            out.push('{');
            rest = after;
          }
        }
      }
      None => {
        out.push_str(&rest[open..]);
        return out;
      }
    }
  }
  out.push_str(rest);
  out
}
