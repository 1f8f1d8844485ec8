use leptos::prelude::*;

use crate::components::secure_diagram::SecureArchitectureDiagram;

/// Landing page with the animated architecture diagram.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"The architecture diagram could not be shown"</h1>

				<p>"Reload the page to try again. Details:"</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<section class="architecture">
				<h1>"Private by Design"</h1>
				<p class="subtitle">
					"Requests leave the client encrypted, reach private auth and AI services, and land in encrypted storage."
				</p>
				<SecureArchitectureDiagram class="architecture__diagram" />
			</section>
		</ErrorBoundary>
	}
}
