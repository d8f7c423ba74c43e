use axum::response::{Html, IntoResponse, Response};

/// Single-page form: two text inputs, one number out.
pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Video Goal Alignment</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 3rem auto; padding: 0 1rem; }
  label { display: block; margin-top: 1rem; font-weight: 600; }
  input, textarea { width: 100%; padding: .5rem; box-sizing: border-box; }
  button { margin-top: 1rem; padding: .5rem 1.5rem; }
  #score { font-size: 3rem; margin: 1rem 0 0; }
  #error { color: #b00020; }
</style>
</head>
<body>
<h1>Video Goal Alignment</h1>
<p>Average of 5 sentence-transformer models.</p>
<form id="score-form">
  <label for="video_url">YouTube URL</label>
  <input id="video_url" name="video_url" type="text" required>
  <label for="goal">Your Goal</label>
  <textarea id="goal" name="goal" rows="3"></textarea>
  <button type="submit">Score</button>
</form>
<label for="score">Score 0–100</label>
<p id="score">–</p>
<p id="error"></p>
<script>
document.getElementById("score-form").addEventListener("submit", async (event) => {
  event.preventDefault();
  const score = document.getElementById("score");
  const error = document.getElementById("error");
  score.textContent = "…";
  error.textContent = "";
  const response = await fetch("/v1/score", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({
      video_url: document.getElementById("video_url").value,
      goal: document.getElementById("goal").value,
    }),
  });
  const body = await response.json();
  if (response.ok) {
    score.textContent = body.score;
  } else {
    score.textContent = "–";
    error.textContent = body.error;
  }
});
</script>
</body>
</html>
"#;

#[tracing::instrument]
pub async fn index_handler() -> Response {
    Html(INDEX_HTML).into_response()
}
