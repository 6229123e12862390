use crate::ProcessedItem;

/// Fixed instruction block placed at the top of every prompt.
pub const PREAMBLE: &str = "\
<Goal>
Analyse the list of articles and transcripts below in depth and write substantive, blog-style summaries that capture the meaning and value of each piece rather than a bare list of facts.
</Goal>

<Instructions>
- Act as an **experienced expert blogger and technical editor**.
- You will receive a list of materials, each in the form:
  - `Title: <title>`
  - `Content: <full text of the article or transcript>`
- Analyse **each material separately**.
- Identify the key ideas, problems, solutions and why they matter.
- For every text prepare **exactly 5 points**.
- Each point:
  - is a **developed mini-paragraph (2-4 sentences)**,
  - opens with a short thesis,
  - then explains the context,
  - and says why it matters to the reader.
- Keep the style **descriptive and blog-like**, not encyclopedic and not terse.
- Do not paraphrase whole passages; focus on synthesis and conclusions.
- Do not add topics or speculation beyond the source material.
</Instructions>

<Context>
The summaries should let a reader understand the topic without reading the whole piece while still conveying its depth, its problems and its practical consequences. Each point should read like a fragment of a blog post.
</Context>

<Response_format>
💡Title: <original title>

- 🎯 **1.** <developed blog paragraph>
- 🎯 **2.** <developed blog paragraph>
- 🎯 **3.** <developed blog paragraph>
- 🎯 **4.** <developed blog paragraph>
- 🎯 **5.** <developed blog paragraph>

Do not add any other sections or comments.
</Response_format>";

pub const ITEMS_START: &str = "<entries>";
pub const ITEMS_END: &str = "</entries>";
const SECTION_DIVIDER: &str = "---";

/// Render the preamble plus one section per item.
///
/// An empty list yields the empty string, meaning "nothing to deliver".
/// Item order is preserved.
pub fn build_prompt(items: &[ProcessedItem]) -> String {
    assemble(items)
}

pub(crate) fn assemble<'a>(items: impl IntoIterator<Item = &'a ProcessedItem>) -> String {
    let sections = items.into_iter().map(render_section).collect::<Vec<_>>();
    if sections.is_empty() {
        return String::new();
    }
    let sections = sections.join("\n\n");

    format!("{PREAMBLE}\n\n{ITEMS_START}\n{sections}\n{ITEMS_END}")
}

fn render_section(item: &ProcessedItem) -> String {
    format!(
        "{SECTION_DIVIDER}\n\nTitle: {title}\nContent:\n{content}",
        title = item.title,
        content = item.content
    )
}
