//! DOM event listeners
//!
//! Each listener turns a browser event into a [`ViewerEvent`] and runs the
//! dispatch on the local executor. Errors end up in an alert using the
//! configured message for their kind.

use std::rc::Rc;

use js_sys::Uint8Array;
use pdfpreview_core::{FileSelection, ViewerError, ViewerEvent};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{DragEvent, Event, EventTarget, File};

use crate::dom::Elements;
use crate::pdfjs::describe;
use crate::Controller;

const DRAGOVER_CLASS: &str = "dragover";

/// Run `event` through the controller without blocking the caller
pub fn dispatch(controller: &Rc<Controller>, event: ViewerEvent) {
    let controller = Rc::clone(controller);
    spawn_local(async move {
        if let Err(err) = controller.dispatch(event).await {
            report(&controller, &err);
        }
    });
}

fn report(controller: &Controller, err: &ViewerError) {
    web_sys::console::error_1(&err.to_string().into());
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(controller.config().message_for(err));
    }
}

/// Read `file` and hand it to the controller
pub fn choose_file(controller: &Rc<Controller>, file: File) {
    let controller = Rc::clone(controller);
    spawn_local(async move {
        match read_file(&file).await {
            Ok(selection) => {
                if let Err(err) = controller.dispatch(ViewerEvent::FileChosen(selection)).await {
                    report(&controller, &err);
                }
            }
            Err(err) => report(&controller, &err),
        }
    });
}

async fn read_file(file: &File) -> Result<FileSelection, ViewerError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ViewerError::invalid_format(describe(&e)))?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    Ok(FileSelection::new(file.name(), file.type_(), bytes))
}

fn listen<F>(target: &EventTarget, event_name: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_click(
    target: &EventTarget,
    controller: &Rc<Controller>,
    event: ViewerEvent,
) -> Result<(), JsValue> {
    let controller = Rc::clone(controller);
    listen(target, "click", move |_| dispatch(&controller, event.clone()))
}

/// Attach every listener the viewer needs. Listeners live as long as the page.
pub fn bind(controller: &Rc<Controller>, elements: &Elements) -> Result<(), JsValue> {
    {
        let controller = Rc::clone(controller);
        let input = elements.file_input.clone();
        listen(&elements.file_input, "change", move |_| {
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                choose_file(&controller, file);
            }
        })?;
    }

    {
        let input = elements.file_input.clone();
        listen(&elements.upload_area, "click", move |_| input.click())?;
    }

    {
        let area = elements.upload_area.clone();
        listen(&elements.upload_area, "dragover", move |event| {
            event.prevent_default();
            let _ = area.class_list().add_1(DRAGOVER_CLASS);
        })?;
    }

    {
        let area = elements.upload_area.clone();
        listen(&elements.upload_area, "dragleave", move |event| {
            event.prevent_default();
            let _ = area.class_list().remove_1(DRAGOVER_CLASS);
        })?;
    }

    {
        let controller = Rc::clone(controller);
        let area = elements.upload_area.clone();
        listen(&elements.upload_area, "drop", move |event| {
            event.prevent_default();
            let _ = area.class_list().remove_1(DRAGOVER_CLASS);

            let file = event
                .dyn_ref::<DragEvent>()
                .and_then(|drag| drag.data_transfer())
                .and_then(|transfer| transfer.files())
                .and_then(|files| files.get(0));
            match file {
                Some(file) => choose_file(&controller, file),
                None => report(
                    &controller,
                    &ViewerError::invalid_format("nothing was dropped"),
                ),
            }
        })?;
    }

    on_click(&elements.prev_page, controller, ViewerEvent::PreviousPage)?;
    on_click(&elements.next_page, controller, ViewerEvent::NextPage)?;
    on_click(&elements.load_another, controller, ViewerEvent::LoadAnother)?;
    on_click(&elements.print_button, controller, ViewerEvent::EnterPrint)?;
    on_click(&elements.back_to_preview, controller, ViewerEvent::ExitPrint)?;
    on_click(&elements.actual_print, controller, ViewerEvent::Print)?;

    Ok(())
}
