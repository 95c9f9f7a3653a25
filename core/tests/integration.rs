//! Form and list components against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the components by
//! executing every `Effect::Send` with ureq and feeding the response back.
//! Checks that the core's requests and parsing agree with a real server.

use karangos_core::{
    ApiError, Client, ClientField, Component, Effect, FormController, FormState, HttpMethod,
    HttpRequest, HttpResponse, ListView, RecordClient, Route, Resource, Vehicle, VehicleField,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's status-code-as-error behavior so 4xx/5xx responses come
/// back as data and the core decides what they mean.
fn execute(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let result = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    };
    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Ok(HttpResponse::new(status, body))
}

/// Run effects to completion, returning everything that was not a request.
fn drive<C: Component>(component: &mut C, effects: Vec<Effect>) -> Vec<Effect> {
    let mut queue = effects;
    let mut rest = Vec::new();
    while !queue.is_empty() {
        let mut next = Vec::new();
        for effect in queue {
            match effect {
                Effect::Send(req) => next.extend(component.on_response(execute(req))),
                other => rest.push(other),
            }
        }
        queue = next;
    }
    rest
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn vehicle_create_list_edit_delete() {
    let api = RecordClient::new(&start_server());

    // Step 1: list is empty.
    let mut list = ListView::<Vehicle>::new(api.clone())
        .ordered_by(&[VehicleField::Brand, VehicleField::Model]);
    let effects = list.mount();
    drive(&mut list, effects);
    assert!(list.rows().is_empty());

    // Step 2: create through the form.
    let mut form = FormController::<Vehicle>::create(api.clone());
    form.mount();
    form.set_field(VehicleField::Brand, "Volkswagen").unwrap();
    form.set_field(VehicleField::Model, "Fusca").unwrap();
    form.set_field(VehicleField::Color, "Azul").unwrap();
    form.set_field(VehicleField::ManufactureYear, 1978).unwrap();
    form.set_field(VehicleField::Imported, false).unwrap();
    form.set_field(VehicleField::Plate, "abc1d23").unwrap();
    form.set_field(VehicleField::Price, "15000").unwrap();
    let effects = form.submit();
    let rest = drive(&mut form, effects);

    assert_eq!(form.state(), FormState::Submitted);
    let id = form.draft().id.expect("server assigns an id");
    assert!(rest.contains(&Effect::Navigate(Route::List(Resource::Vehicles))));

    // Step 3: list shows it.
    let effects = list.refresh();
    drive(&mut list, effects);
    assert_eq!(list.rows().len(), 1);
    assert_eq!(list.rows()[0].plate, "ABC-1D23");
    assert_eq!(list.rows()[0].price_label().as_deref(), Some("R$ 15.000,00"));

    // Step 4: edit loads the stored record and saves a change.
    let mut edit = FormController::<Vehicle>::edit(api.clone(), id);
    let effects = edit.mount();
    drive(&mut edit, effects);
    assert_eq!(edit.state(), FormState::Editing);
    assert_eq!(edit.draft(), &list.rows()[0]);

    edit.set_field(VehicleField::Price, "16500.5").unwrap();
    let effects = edit.submit();
    drive(&mut edit, effects);
    assert_eq!(edit.state(), FormState::Submitted);
    assert_eq!(edit.draft().price, "16500.5");

    // Step 5: delete from the list.
    list.delete(id);
    let effects = list.resolve_prompt(true);
    drive(&mut list, effects);
    assert!(list.rows().is_empty());

    // Step 6: editing a deleted record fails to load.
    let mut gone = FormController::<Vehicle>::edit(api, id);
    let effects = gone.mount();
    let rest = drive(&mut gone, effects);
    assert_eq!(gone.state(), FormState::LoadFailed);
    assert!(matches!(&rest[..], [Effect::Notify(n)] if n.persistent));
}

#[test]
fn client_form_round_trip() {
    let api = RecordClient::new(&start_server());

    let mut form = FormController::<Client>::create(api.clone());
    form.mount();
    let values = [
        (ClientField::Name, "Maria da Silva"),
        (ClientField::Cpf, "12345678900"),
        (ClientField::Rg, "123456789"),
        (ClientField::Street, "Rua das Flores"),
        (ClientField::HouseNumber, "120"),
        (ClientField::Neighborhood, "Centro"),
        (ClientField::Municipality, "Franca"),
        (ClientField::State, "SP"),
        (ClientField::Phone, "(16) 99999-0000"),
        (ClientField::Email, "maria@example.com"),
    ];
    for (field, value) in values {
        form.set_field(field, value).unwrap();
    }
    assert!(form.errors().is_valid());

    let effects = form.submit();
    drive(&mut form, effects);
    assert_eq!(form.state(), FormState::Submitted);
    assert_eq!(form.draft().cpf, "123.456.789-00");
    assert_eq!(form.draft().rg, "12.345.678-9");

    let mut list = ListView::<Client>::new(api).ordered_by(&[ClientField::Name]);
    let effects = list.mount();
    drive(&mut list, effects);
    assert_eq!(list.rows(), std::slice::from_ref(form.draft()));
}

#[test]
fn unreachable_server_leaves_list_empty() {
    // Bind then drop so the port is closed.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let mut list = ListView::<Client>::new(RecordClient::new(&format!("http://{addr}")));
    let effects = list.mount();
    let rest = drive(&mut list, effects);
    assert!(rest.is_empty());
    assert!(list.rows().is_empty());
}
