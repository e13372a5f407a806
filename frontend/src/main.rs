mod components;
mod context;
mod pages;
mod router;
mod services;
mod session;

use yew::prelude::*;
use yew_router::BrowserRouter;

use crate::context::SessionContext;
use crate::router::{switch, Route};
use crate::services::{ApiService, LocalTokenStorage};
use crate::session::SessionManager;

#[function_component(App)]
fn app() -> Html {
    let manager = use_memo((), |_| {
        let manager = SessionManager::new(LocalTokenStorage, ApiService::new(LocalTokenStorage));
        manager.restore();
        manager
    });
    let authenticated = use_state(|| manager.is_authenticated());

    {
        let manager = manager.clone();
        let setter = authenticated.setter();
        use_effect_with((), move |_| {
            manager.subscribe(move |value| setter.set(value));
            || ()
        });
    }

    let context = SessionContext {
        manager,
        authenticated: *authenticated,
    };

    html! {
        <ContextProvider<SessionContext> context={context}>
            <BrowserRouter>
                <div id="app">
                    <components::header::Header />
                    <yew_router::Switch<Route> render={switch} />
                </div>
            </BrowserRouter>
        </ContextProvider<SessionContext>>
    }
}

fn main() {
    tracing_wasm::set_as_global_default();

    yew::Renderer::<App>::new().render();
}
