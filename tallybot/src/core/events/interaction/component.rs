use std::sync::Arc;

use eyre::Result;
use tallybot_util::MessageBuilder;

use crate::{
    core::{events::EventKind, Context, ERROR_REPORT_READ},
    leaderboard::{Activation, ActivationResponder, InteractionResponder, Leaderboards},
    util::{
        interaction::{InteractionComponent, InteractionModal},
        Authored, ComponentExt,
    },
};

pub async fn handle_component(ctx: Arc<Context>, component: InteractionComponent) {
    let name = component.data.custom_id.clone();
    EventKind::Component.log(&ctx, &component, &name);

    let res = if name == ERROR_REPORT_READ {
        remove_components(&ctx, &component).await
    } else if Leaderboards::is_control(&name) {
        handle_leaderboard_control(&ctx, component).await
    } else {
        return error!("Unknown message component `{name}`");
    };

    if let Err(err) = res {
        let wrap = format!("Failed to process component `{name}`");
        error!("{:?}", err.wrap_err(wrap));
    }
}

pub async fn handle_modal(ctx: Arc<Context>, modal: InteractionModal) {
    let name = modal.data.custom_id.clone();
    EventKind::Modal.log(&ctx, &modal, &name);

    if !Leaderboards::is_control(&name) {
        return error!("Unknown modal `{name}`");
    }

    if let Err(err) = handle_leaderboard_modal(&ctx, modal).await {
        let wrap = format!("Failed to process modal `{name}`");
        error!("{:?}", err.wrap_err(wrap));
    }
}

async fn handle_leaderboard_control(
    ctx: &Arc<Context>,
    component: InteractionComponent,
) -> Result<()> {
    let activation = Activation {
        custom_id: component.data.custom_id.clone(),
        user: component.user_id()?,
        input: None,
        responder: Box::new(InteractionResponder::new(
            Arc::clone(ctx),
            component.id,
            component.token.clone(),
        )),
    };

    if ctx.leaderboards.dispatch(activation).is_ok() {
        return Ok(());
    }

    // The session is gone, e.g. after a restart
    remove_components(ctx, &component).await
}

async fn handle_leaderboard_modal(ctx: &Arc<Context>, modal: InteractionModal) -> Result<()> {
    let activation = Activation {
        input: modal.input_value().map(str::to_owned),
        custom_id: modal.data.custom_id.clone(),
        user: modal.user_id()?,
        responder: Box::new(InteractionResponder::new(
            Arc::clone(ctx),
            modal.id,
            modal.token,
        )),
    };

    match ctx.leaderboards.dispatch(activation) {
        Ok(()) => Ok(()),
        Err(activation) => {
            debug!(custom_id = %activation.custom_id, "Modal of an expired leaderboard");

            activation.responder.defer_update().await
        }
    }
}

async fn remove_components(ctx: &Context, component: &InteractionComponent) -> Result<()> {
    let builder = MessageBuilder::new().components(Vec::new());

    component.callback(ctx, builder).await
}
