use leptos::prelude::*;
use web_sys::HtmlElement;

use super::cycle::Timings;
use super::dom::{DomSurface, WebScheduler};
use super::lifecycle::{DiagramEngine, DiagramScope};
use super::types::{ConnectorId, ElementId, NodeId};

type DomScope = DiagramScope<DomSurface, WebScheduler>;

#[component]
fn DiagramNode(node: NodeId) -> impl IntoView {
	view! { <div class=format!("module {}", node.class_name())>{node.label()}</div> }
}

#[component]
pub fn SecureArchitectureDiagram(#[prop(optional, into)] class: String) -> impl IntoView {
	let diagram_ref = NodeRef::<leptos::html::Div>::new();
	let scope = StoredValue::new_local(None::<DomScope>);

	Effect::new(move |_| {
		let Some(container) = diagram_ref.get() else {
			return;
		};
		if scope.with_value(Option::is_some) {
			return;
		}
		let container: HtmlElement = container.into();
		let engine = DiagramEngine::new(
			DomSurface::new(container),
			WebScheduler::default(),
			Timings::default(),
		);
		leptos::task::spawn_local(std::rc::Rc::clone(&engine).activate());
		scope.set_value(Some(DiagramScope::new(engine)));
	});

	// Dropping the scope stops the loop and cancels pending frames.
	on_cleanup(move || {
		let _ = scope.try_update_value(|scope| scope.take());
	});

	view! {
		<div node_ref=diagram_ref class=format!("secure-diagram {class}")>
			<div class="secure-diagram__column">
				<DiagramNode node={NodeId::Client} />
				<DiagramNode node={NodeId::EncryptedStorage} />
			</div>
			<div class="secure-diagram__column">
				<DiagramNode node={NodeId::PrivateAuth} />
				<DiagramNode node={NodeId::PrivateAi} />
			</div>
			{ConnectorId::ALL
				.into_iter()
				.map(|connector| view! { <div class="connection" id=connector.element_id()></div> })
				.collect_view()}
			<div class={ElementId::MARKER_CLASS}></div>
		</div>
	}
}
