//! Canned workbench content for previews.

/// Name of the bundled scenario.
pub const DEMO_SCENARIO: &str = "Markdown block";

/// Markup for a block exercising the common Markdown constructs. The body is
/// indented as it would be inside a course file.
pub const DEMO_XML: &str = r#"<markdown display_name="Markdown demo">
    # This is an h1

    ## This is an h2

    This is a regular paragraph.

        This is a code block.

    ```
    #!/bin/bash

    echo "This is a fenced code block."
    ```

    ```python
    from course.blocks import ContentBlock

    class MarkdownBlock(ContentBlock):
        "This is a colored fence block."
    ```

    > This is a blockquote.

    * This is
    * an unordered
    * list

    1. This is
    1. an ordered
    1. list

    [Link to cat](http://i.imgur.com/3xVUnyA.jpg)

    ![Cat](http://i.imgur.com/3xVUnyA.jpg)
</markdown>"#;

/// Scenarios available to the preview tooling, as `(name, markup)` pairs.
pub fn workbench_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![(DEMO_SCENARIO, DEMO_XML)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockRuntime, ContentBlock, ViewContext};
    use mdblock_core::{HostState, MemoryAssetStore, StaticResourceLocator};

    fn render_demo() -> String {
        let runtime = BlockRuntime::new(HostState::new(
            MemoryAssetStore::new(),
            StaticResourceLocator::default(),
        ))
        .unwrap();
        let block = ContentBlock::from_xml(DEMO_XML).unwrap();
        block
            .render(&ViewContext::new(&runtime))
            .unwrap()
            .content()
            .to_string()
    }

    #[test]
    fn test_demo_loads() {
        let block = ContentBlock::from_xml(DEMO_XML).unwrap();
        assert_eq!(block.title, "Markdown demo");
        assert!(block.content.starts_with("# This is an h1\n"));
        assert!(block.content.contains("\n    This is a code block.\n"));
        assert!(block.content.ends_with("![Cat](http://i.imgur.com/3xVUnyA.jpg)"));
    }

    #[test]
    fn test_demo_renders_all_constructs() {
        let html = render_demo();
        assert!(html.contains("<h1>This is an h1</h1>"));
        assert!(html.contains("<h2>This is an h2</h2>"));
        assert!(html.contains("<p>This is a regular paragraph.</p>"));
        assert!(html.contains("<pre><code>This is a code block.\n</code></pre>"));
        assert!(html.contains("<pre><code>#!/bin/bash\n"));
        assert!(html.contains("<code class=\"language-python\">"));
        assert!(html.contains("<blockquote>"));
        assert!(html.contains("<ul>"));
        assert!(html.contains("<ol>"));
        assert!(html.contains("<a href=\"http://i.imgur.com/3xVUnyA.jpg\">Link to cat</a>"));
        assert!(html.contains("<img src=\"http://i.imgur.com/3xVUnyA.jpg\" alt=\"Cat\""));
    }

    #[test]
    fn test_workbench_scenarios() {
        let scenarios = workbench_scenarios();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].0, DEMO_SCENARIO);
    }
}
