use ezwrite_engine::editing::{classify_all, render_surface};
use ezwrite_engine::editing::strike::STRUCK_MARKER;

fn html(text: &str, editing_timer_line: Option<usize>) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let types = classify_all(&lines);
    render_surface(&lines, &types, editing_timer_line)
        .to_html()
        .replace("</div>", "</div>\n")
        .trim_end()
        .to_string()
}

#[test]
fn surface_html_mixed_document() {
    let text = format!(
        "# Groceries\nlist\nbuy milk\n{STRUCK_MARKER}eggs\n\nline\ntimer 5\n**bold** & more"
    );
    insta::assert_snapshot!(html(&text, None), @r#"
    <div data-type="heading1"># Groceries</div>
    <div data-type="list-header" contenteditable="false"><span class="ce-label">list</span><button data-action="delete" data-line="1">✕</button></div>
    <div data-type="list-item" data-struck="false"><span contenteditable="false" class="ce-checkbox" data-action="toggle" data-line="2"></span><span class="ce-li-text">buy milk</span></div>
    <div data-type="list-item" data-struck="true"><span contenteditable="false" class="ce-checkbox ce-checked" data-action="toggle" data-line="3"></span><span class="ce-li-text">eggs</span></div>
    <div data-type="text"><br></div>
    <div data-type="divider" contenteditable="false"><hr/><button data-action="delete" data-line="5">✕</button></div>
    <div data-type="timer" contenteditable="false"><span class="ce-timer" data-timer-config="5" data-timer-slot="6"></span></div>
    <div data-type="text">**bold** &amp; more</div>
    "#);
}

#[test]
fn surface_html_timer_in_edit_mode() {
    insta::assert_snapshot!(html("timer 1:30", Some(0)), @r#"<div data-type="text">timer 1:30</div>"#);
}

#[test]
fn surface_html_escapes_markup() {
    insta::assert_snapshot!(html("<b>hi</b>", None), @r#"<div data-type="text">&lt;b&gt;hi&lt;/b&gt;</div>"#);
}
