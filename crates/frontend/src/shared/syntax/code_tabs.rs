//! CodeTabs component - one code example rendered in the current syntax.

use leptos::logging::log;
use leptos::prelude::*;
use preference::{TabGroup, Variant};
use std::sync::Arc;

use super::use_syntax;

/// Code example with one tab per syntax variant.
///
/// Subscribes to the page's broadcaster while mounted and unsubscribes in
/// `on_cleanup`. A variant missing for the current preference falls back to
/// the first one for this example only.
#[component]
pub fn CodeTabs(
    /// Renditions in display order; must not be empty
    variants: Vec<Variant>,
    /// Optional caption
    #[prop(optional, into)]
    title: Option<String>,
) -> impl IntoView {
    let ctx = use_syntax();
    let mut group = TabGroup::new(variants).expect("CodeTabs needs at least one variant");

    let active = RwSignal::new(0usize);
    if let Err(e) =
        group.mount_with_observer(&ctx.broadcaster, ctx.current(), move |index| active.set(index))
    {
        log::error!("CodeTabs failed to subscribe: {}", e);
    }
    active.set(group.active_index());

    log!(
        "CodeTabs mounted: labels {:?}, showing {}",
        group.labels(),
        group.active_label()
    );

    let variants: Arc<[Variant]> = group.variants().into();
    let labels = group.labels();

    on_cleanup(move || {
        let mut group = group;
        group.unmount();
    });

    let source = {
        let variants = Arc::clone(&variants);
        move || variants[active.get()].content.source.clone()
    };
    let code_class = move || format!("language-{}", variants[active.get()].content.language);

    view! {
        <figure class="code-tabs">
            {title.map(|t| view! {
                <figcaption class="code-tabs__title">{t}</figcaption>
            })}
            <div class="code-tabs__labels" role="tablist">
                {labels.into_iter().enumerate().map(|(index, label)| {
                    let is_active = move || active.get() == index;
                    view! {
                        <span
                            role="tab"
                            class="code-tabs__label"
                            class:code-tabs__label--active=is_active
                            aria-selected=move || is_active().to_string()
                        >
                            {label.display_name()}
                        </span>
                    }
                }).collect_view()}
            </div>
            <pre class="code-tabs__body">
                <code class=code_class>{source}</code>
            </pre>
        </figure>
    }
}
