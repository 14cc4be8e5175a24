use crate::pages::ArrowFunctionsPage;
use crate::shared::syntax::SyntaxProvider;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // One preference store and broadcaster for every code example on the page.
    view! {
        <SyntaxProvider>
            <ArrowFunctionsPage />
        </SyntaxProvider>
    }
}
