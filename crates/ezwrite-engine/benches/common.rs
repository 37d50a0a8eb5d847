// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_document(sections: usize) -> String {
    let base = "# Today\nSome prose about the day.\nlist\nbuy milk\n\u{200B}\u{2713}eggs\n        indented note\n\nline\ntimer 25\nMore prose after the rule.\n";
    base.repeat(sections)
}

#[allow(dead_code)]
pub fn generate_long_list(items: usize) -> String {
    let mut content = String::from("list\n");
    for i in 0..items {
        content.push_str(&format!("item {i}\n"));
    }
    content
}
