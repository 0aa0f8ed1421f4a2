use std::path::Path;

use ui_lint_rules::fixes::stem;

use super::{arg, Args, GeneratedFile, TransformCx, Transformer};
use crate::error::TransformError;

/// Creates a render test next to a component.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaffoldTest;

/// Text of a minimal render test for `component`, imported from
/// `import_path` by name or as the default export.
#[must_use]
pub fn scaffold_test_text(component: &str, import_path: &str, default_export: bool) -> String {
    let import = if default_export {
        format!("import {component} from \"{import_path}\";")
    } else {
        format!("import {{ {component} }} from \"{import_path}\";")
    };
    format!(
        "import {{ render }} from \"@testing-library/react\";\n\
         {import}\n\
         \n\
         describe(\"{component}\", () => {{\n\
         \x20 it(\"renders without crashing\", () => {{\n\
         \x20   const {{ container }} = render(<{component} />);\n\
         \x20   expect(container).toBeTruthy();\n\
         \x20 }});\n\
         }});\n"
    )
}

impl Transformer for ScaffoldTest {
    fn id(&self) -> &'static str {
        "scaffold-test"
    }

    fn apply(&self, cx: &mut TransformCx<'_>, args: &Args) -> Result<(), TransformError> {
        let component = arg(args, "component")?;
        let default_export = args.get("export").is_some_and(|e| e == "default");

        // Derived from where the unit ends up, so a rename in the same run
        // is followed.
        let current = cx.current_path();
        let file_stem = stem(current).to_string();
        let dir = current.parent().unwrap_or_else(|| Path::new(""));
        let path = dir.join(format!("{file_stem}.test.tsx"));
        let text = scaffold_test_text(component, &format!("./{file_stem}"), default_export);

        if cx.generated.iter().any(|g| g.path == path) {
            return Ok(());
        }
        cx.generated.push(GeneratedFile { path, text });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use ui_lint_core::Conventions;
    use ui_lint_ts::SourceUnit;

    #[test]
    fn scaffold_text() {
        insta::assert_snapshot!(scaffold_test_text("UserCard", "./user-card", false), @r###"
        import { render } from "@testing-library/react";
        import { UserCard } from "./user-card";

        describe("UserCard", () => {
          it("renders without crashing", () => {
            const { container } = render(<UserCard />);
            expect(container).toBeTruthy();
          });
        });
        "###);
    }

    #[test]
    fn follows_relocation() {
        let mut unit = SourceUnit::parse("/p/src/UserCard.tsx", "export default function UserCard() { return <i />; }\n").unwrap();
        let conventions = Conventions::default();
        let mut cx = TransformCx::new(&mut unit, PathBuf::from("src/UserCard.tsx"), &conventions);
        cx.relocation = Some(PathBuf::from("src/user-card.tsx"));
        let args: Args = [
            ("component".to_string(), "UserCard".to_string()),
            ("export".to_string(), "default".to_string()),
        ]
        .into_iter()
        .collect();
        ScaffoldTest.apply(&mut cx, &args).unwrap();
        assert_eq!(cx.generated[0].path, PathBuf::from("src/user-card.test.tsx"));
        assert!(cx.generated[0].text.contains("import UserCard from \"./user-card\";"));
    }
}
