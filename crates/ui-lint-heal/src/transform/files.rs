use std::path::{Component, Path, PathBuf};

use ui_lint_ts::Dialect;

use super::{arg, Args, TransformCx, Transformer};
use crate::error::TransformError;

/// Records a new location for the unit. The move itself happens when the
/// write set is flushed.
#[derive(Debug, Clone, Copy)]
pub struct Relocate {
    id: &'static str,
}

impl Relocate {
    /// `rename-file`: same directory, new name.
    #[must_use]
    pub fn rename() -> Self {
        Self { id: "rename-file" }
    }

    /// `move-file`: new directory.
    #[must_use]
    pub fn moving() -> Self {
        Self { id: "move-file" }
    }
}

fn validate_target(to: &Path) -> Result<(), TransformError> {
    let escapes = to
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || to.as_os_str().is_empty() {
        return Err(TransformError::Unsupported(format!(
            "target `{}` is not a path inside the project",
            to.display()
        )));
    }
    if Dialect::from_path(to).is_none() {
        return Err(TransformError::Unsupported(format!(
            "target `{}` has no source extension",
            to.display()
        )));
    }
    Ok(())
}

impl Transformer for Relocate {
    fn id(&self) -> &'static str {
        self.id
    }

    fn apply(&self, cx: &mut TransformCx<'_>, args: &Args) -> Result<(), TransformError> {
        let to = PathBuf::from(arg(args, "to")?);
        validate_target(&to)?;
        if to != cx.current_path() {
            cx.relocation = Some(to);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ui_lint_core::Conventions;
    use ui_lint_ts::SourceUnit;

    #[test]
    fn records_relocation_and_rejects_escapes() {
        let mut unit = SourceUnit::parse("/p/src/UserCard.tsx", "export const UserCard = () => <i />;\n").unwrap();
        let conventions = Conventions::default();
        let mut cx = TransformCx::new(&mut unit, PathBuf::from("src/UserCard.tsx"), &conventions);

        let args: Args = [("to".to_string(), "../outside.tsx".to_string())].into_iter().collect();
        assert!(Relocate::rename().apply(&mut cx, &args).is_err());

        let args: Args = [("to".to_string(), "src/user-card.tsx".to_string())].into_iter().collect();
        Relocate::rename().apply(&mut cx, &args).unwrap();
        assert_eq!(cx.current_path(), Path::new("src/user-card.tsx"));
    }
}
