use tracing::info;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> Result<impl warp::Reply, warp::Rejection> {
    info!("Received request for index page");
    Ok(warp::reply::html(INDEX_HTML))
}
