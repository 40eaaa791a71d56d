use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use chrono::Local;

use crate::AppState;
use crate::entities::ride::{RideForm, RideQuery};
use crate::error::{AppError, AppResult};
use crate::views::{FormView, PageView, ResultView};

/// Render the page with today's defaults
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let query = RideQuery::default_at(Local::now().date_naive());
    let page = PageView::form_only(FormView::from_query(&query));

    Ok(Html(state.views.render_page(&page)?))
}

/// Run one submission cycle: ask the API for a fare, then render the fare,
/// the trip distance and the map. A failed call renders only the error.
#[tracing::instrument(skip_all, fields(cycle_id = %uuid::Uuid::new_v4()))]
pub async fn predict(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<RideForm>, AppError>,
) -> AppResult<Response> {
    let query = form.into_query()?;
    let form_view = FormView::from_query(&query);

    tracing::info!(
        pickup_datetime = %query.formatted_pickup_datetime(),
        passenger_count = query.passenger_count,
        "Fare requested"
    );

    let fare = match state.fare_api.predict(&query).await {
        Ok(fare) => fare,
        Err(err) => {
            tracing::warn!(error = %err, "Fare prediction failed");
            let page = PageView::with_error(form_view, err.user_message());
            let html = state.views.render_page(&page)?;
            return Ok((StatusCode::BAD_GATEWAY, Html(html)).into_response());
        }
    };

    let distance_km = query.distance_km();
    tracing::info!(fare = fare.fare, distance_km, "Fare predicted");

    let page = PageView::with_result(form_view, ResultView::new(&fare, distance_km, &query));
    Ok(Html(state.views.render_page(&page)?).into_response())
}
