use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/cats", cat_routes())
        .nest("/litters", litter_routes())
        .nest("/achievements", achievement_routes())
        .nest("/lookups", lookup_routes())
        .nest("/admin", admin_routes(config))
}

fn cat_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::cat::list_breeding_cats))
        .routes(routes!(handlers::cat::get_cat))
}

fn litter_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::litter::list_litters))
        .routes(routes!(handlers::litter::list_past_litters))
}

fn achievement_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::achievement::list_achievements))
}

fn lookup_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::lookup::list_lookups))
}

fn admin_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/cats", admin_cat_routes())
        .nest("/litters", admin_litter_routes())
        .nest("/achievements", admin_achievement_routes())
        .nest("/lookups", admin_lookup_routes())
        .nest("/gallery", gallery_routes(config))
        .nest("/images", image_routes())
}

fn admin_cat_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::cat::list_all_cats,
            handlers::cat::create_cat
        ))
        .routes(routes!(
            handlers::cat::update_cat,
            handlers::cat::delete_cat
        ))
        .routes(routes!(handlers::cat::set_cat_traits))
        .routes(routes!(handlers::cat::add_medical_test))
        .routes(routes!(handlers::cat::delete_medical_test))
}

fn admin_litter_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::litter::list_all_litters,
            handlers::litter::create_litter
        ))
        .routes(routes!(
            handlers::litter::update_litter,
            handlers::litter::delete_litter
        ))
        .routes(routes!(handlers::litter::set_kittens))
}

fn admin_achievement_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::achievement::create_achievement))
        .routes(routes!(
            handlers::achievement::update_achievement,
            handlers::achievement::delete_achievement
        ))
        .routes(routes!(handlers::achievement::attach_image))
        .routes(routes!(handlers::achievement::swap_images))
}

fn admin_lookup_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::lookup::create_color))
        .routes(routes!(handlers::lookup::create_variety))
}

fn gallery_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let browse = OpenApiRouter::new()
        .routes(routes!(handlers::gallery::list_gallery))
        .routes(routes!(
            handlers::gallery::create_folder,
            handlers::gallery::rename_folder,
            handlers::gallery::delete_folder
        ))
        .routes(routes!(handlers::gallery::assign_image))
        .routes(routes!(handlers::gallery::unassign_image));

    let upload = OpenApiRouter::new()
        .routes(routes!(
            handlers::gallery::upload_image,
            handlers::gallery::delete_image
        ))
        .layer(handlers::gallery::upload_body_limit(
            config.server.max_upload_size,
        ));

    browse.merge(upload)
}

fn image_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::image::set_primary))
        .routes(routes!(handlers::image::update_metadata))
}
