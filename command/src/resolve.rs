//! Option value resolution.

use buildline_core::{OptionSpec, OptionValue, OptionValues, ResolvedOptions};

/// Resolves every declared option to a value.
///
/// For each option, in declaration order, the first of these wins:
/// the command's own truthy value, the parent's truthy value (only when
/// `check_parent` is set), the declared default, the empty string.
///
/// # Examples
///
/// ```
/// use buildline_command::resolve_options;
/// use buildline_core::{DefaultValue, OptionSpec, OptionValue, OptionValues};
///
/// let declared = vec![
///     OptionSpec::new("type", "-t, --type [type]")
///         .with_default(DefaultValue::Text("development".into())),
///     OptionSpec::flag("watch", "-w, --watch"),
/// ];
/// let mut own = OptionValues::new();
/// own.insert("watch".into(), OptionValue::from(true));
///
/// let resolved = resolve_options(&declared, &own, None, true);
/// assert_eq!(resolved["type"], OptionValue::from("development"));
/// assert_eq!(resolved["watch"], OptionValue::from(true));
/// ```
pub fn resolve_options(
    declared: &[OptionSpec],
    own: &OptionValues,
    parent: Option<&OptionValues>,
    check_parent: bool,
) -> ResolvedOptions {
    declared
        .iter()
        .map(|option| {
            let value = truthy(own, &option.name)
                .or_else(|| {
                    parent
                        .filter(|_| check_parent)
                        .and_then(|values| truthy(values, &option.name))
                })
                .cloned()
                .or_else(|| option.default_value.as_ref().map(OptionValue::from))
                .unwrap_or_default();
            (option.name.clone(), value)
        })
        .collect()
}

fn truthy<'a>(values: &'a OptionValues, name: &str) -> Option<&'a OptionValue> {
    values.get(name).filter(|value| value.is_truthy())
}
