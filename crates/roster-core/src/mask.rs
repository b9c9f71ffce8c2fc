//! Privacy display mode for names.

/// Mask a display name: one or two characters keep the first and append `*`;
/// longer names keep the first and last with a single `*` between.
///
/// Works on characters, so multi-byte names mask the same way as ASCII ones.
pub fn mask_name(name: &str) -> String {
  let mut chars = name.chars();
  let Some(first) = chars.next() else {
    return String::new();
  };
  match chars.clone().count() {
    0 | 1 => format!("{first}*"),
    _ => {
      let last = chars.next_back().unwrap_or(first);
      format!("{first}*{last}")
    }
  }
}

/// [`mask_name`] when `masked`, the name unchanged otherwise.
pub fn display_name(name: &str, masked: bool) -> String {
  if masked { mask_name(name) } else { name.to_owned() }
}
