//! Tutorial page used to host the code examples.
//!
//! The text is placeholder content; the page exists so several independent
//! `CodeTabs` share one `SyntaxSelector`.

use crate::shared::syntax::{CodeTabs, SyntaxSelector};
use leptos::prelude::*;
use preference::{Preference, Variant};

/// Callbacks: every syntax has a rendition.
pub fn callback_example() -> Vec<Variant> {
    vec![
        Variant::js(
            Preference::Es5,
            "var doubled = numbers.map(function (n) {\n  return n * 2;\n});",
        ),
        Variant::js(Preference::Es6, "const doubled = numbers.map(n => n * 2);"),
        Variant::js(
            Preference::EsNext,
            "const doubled = numbers.map(n => n * 2);\nconst last = doubled.at(-1);",
        ),
    ]
}

/// Lexical `this`: nothing new past ES6.
pub fn lexical_this_example() -> Vec<Variant> {
    vec![
        Variant::js(
            Preference::Es5,
            "function Timer() {\n  var self = this;\n  self.seconds = 0;\n  setInterval(function () {\n    self.seconds++;\n  }, 1000);\n}",
        ),
        Variant::js(
            Preference::Es6,
            "function Timer() {\n  this.seconds = 0;\n  setInterval(() => {\n    this.seconds++;\n  }, 1000);\n}",
        ),
    ]
}

/// Class fields: no ES5 rendition.
pub fn class_field_example() -> Vec<Variant> {
    vec![
        Variant::js(
            Preference::Es6,
            "class Counter {\n  constructor() {\n    this.count = 0;\n    this.increment = () => { this.count++; };\n  }\n}",
        ),
        Variant::js(
            Preference::EsNext,
            "class Counter {\n  count = 0;\n  increment = () => { this.count++; };\n}",
        ),
    ]
}

#[component]
pub fn ArrowFunctionsPage() -> impl IntoView {
    view! {
        <article class="tutorial">
            <header class="tutorial__header">
                <h1>"Arrow functions"</h1>
                <SyntaxSelector />
            </header>

            <p>"Arrow functions are a shorter way to write function expressions."</p>
            <CodeTabs title="Callbacks" variants=callback_example() />

            <p>"They do not bind their own this, which removes the self = this dance."</p>
            <CodeTabs title="Lexical this" variants=lexical_this_example() />

            <p>"Combined with class fields they make bound handlers a one-liner."</p>
            <CodeTabs title="Bound handlers" variants=class_field_example() />
        </article>
    }
}
