use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Serialize;

use crate::attendance::AttendanceInput;
use crate::error::AnalysisError;
use crate::model::{ModelInfo, RiskClassifier};
use crate::report::Analyzer;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for AnalysisError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::NoClassesCompleted => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AnalysisError::Classifier(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

/// Registers every route. The caller provides `web::Data<dyn RiskClassifier>`
/// and `web::Data<ModelInfo>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(serve_homepage))
        .route("/analyze", web::post().to(analyze))
        .route("/model/info", web::get().to(get_model_info))
        .route("/health", web::get().to(health_check));
}

// Rejected bodies (negative counts, nulls from blank fields) answer in the
// same JSON shape as every other analysis error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AnalysisError::InvalidInput(err.to_string()).into()
    })
}

async fn analyze(
    input: web::Json<AttendanceInput>,
    classifier: web::Data<dyn RiskClassifier>,
) -> Result<HttpResponse, AnalysisError> {
    let report = Analyzer::new(classifier.get_ref()).analyze(&input)?;
    Ok(HttpResponse::Ok().json(report))
}

async fn get_model_info(info: web::Data<ModelInfo>) -> HttpResponse {
    HttpResponse::Ok().json(info.as_ref())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Attendance Risk API is running!")
}

async fn serve_homepage() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(HOMEPAGE)
}

const HOMEPAGE: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Student Attendance Risk Prediction System</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; }
        .container { background: #f5f5f5; padding: 25px; border-radius: 10px; }
        .form-group { margin: 15px 0; }
        label { display: block; margin-bottom: 5px; font-weight: bold; }
        input { width: 100%; padding: 10px; border: 1px solid #ddd; border-radius: 4px; }
        button { background: #007bff; color: white; padding: 12px 24px; border: none; border-radius: 4px; cursor: pointer; }
        button:hover { background: #0056b3; }
        .result { margin-top: 20px; padding: 20px; border-radius: 5px; display: none; }
        .success { background: #d4edda; color: #155724; border: 1px solid #c3e6cb; }
        .error { background: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; }
        .warning { background: #fff3cd; color: #856404; border: 1px solid #ffeaa7; }
        .info { background: #d1ecf1; color: #0c5460; border: 1px solid #bee5eb; }
        .note { padding: 10px; border-radius: 5px; margin: 8px 0; }
    </style>
</head>
<body>
    <div class="container">
        <h1>🎓 Student Attendance Risk Prediction System</h1>
        <h2>📥 Enter Attendance Details</h2>

        <div class="form-group">
            <label for="classes_per_day">Classes per day</label>
            <input type="number" id="classes_per_day" min="1" value="6">
        </div>
        <div class="form-group">
            <label for="total_working_days">Total working days in semester</label>
            <input type="number" id="total_working_days" min="1" value="80">
        </div>
        <div class="form-group">
            <label for="days_completed">Days completed so far</label>
            <input type="number" id="days_completed" min="0" value="30">
        </div>
        <div class="form-group">
            <label for="days_attended">Days attended so far</label>
            <input type="number" id="days_attended" min="0" value="25">
        </div>
        <div class="form-group">
            <label for="required_percentage">Required attendance (%)</label>
            <input type="number" id="required_percentage" min="50" max="100" value="75">
        </div>

        <button onclick="analyze()">Analyze Attendance</button>

        <div id="result" class="result"></div>
    </div>

    <script>
        const bandText = {
            Safe: '😊 Safe', AlmostThere: '🙂 Almost there', SlightRisk: '😐 Slight Risk',
            AtRisk: '😕 At Risk', HighRisk: '😟 High Risk', VeryHighRisk: '😰 Very High Risk', Dead: '💀 Dead'
        };
        const riskText = { 'Safe': '😊 Safe', 'At Risk': '😟 At Risk', 'Critical': '💀 Critical' };

        function field(id) {
            return parseInt(document.getElementById(id).value, 10);
        }

        async function analyze() {
            const resultDiv = document.getElementById('result');
            const body = {
                classes_per_day: field('classes_per_day'),
                total_working_days: field('total_working_days'),
                days_completed: field('days_completed'),
                days_attended: field('days_attended'),
                required_percentage: parseFloat(document.getElementById('required_percentage').value)
            };

            try {
                const response = await fetch('/analyze', {
                    method: 'POST',
                    headers: {'Content-Type': 'application/json'},
                    body: JSON.stringify(body)
                });
                const data = await response.json();
                resultDiv.style.display = 'block';

                if (!response.ok) {
                    resultDiv.className = 'result error';
                    resultDiv.innerHTML = `<p>${data.error}</p>`;
                    return;
                }

                const p = data.projection;
                const reachable = p.needed_days !== null;
                const exceeded = p.remaining_leaves < 0;
                let html = `
                    <h3>📊 Current Status</h3>
                    <p><strong>Current Attendance:</strong> ${p.current_percentage.toFixed(2)}% ${bandText[data.band]}</p>
                    <h3>📈 Guidance</h3>
                    <div class="note ${reachable ? 'success' : 'error'}">${data.guidance}</div>
                    <div class="note ${exceeded ? 'warning' : 'info'}">${data.leave_advice}</div>
                    <h3>🤖 ML Prediction</h3>
                    <p><strong>Current Prediction:</strong> ${riskText[data.current_risk]}</p>
                `;

                if (data.after_needed_days) {
                    const f = data.after_needed_days;
                    html += `<p><strong>If you attend ${f.days} days → Attendance: ${f.attendance_percentage.toFixed(2)}%
                        ${bandText[f.band]} → ML: ${riskText[f.risk_label]}</strong></p>`;
                }

                if (!exceeded) {
                    html += `<h3>🧪 What if you take more leave days?</h3>`;
                    html += data.scenarios.map(row => `
                        <p>If you take <strong>${row.total_leave_days} leave days</strong> →
                        Final Attendance: <strong>${row.final_percentage.toFixed(2)}%</strong>
                        ${bandText[row.band]} → ML: ${riskText[row.risk_label]}</p>
                    `).join('');
                }

                resultDiv.className = 'result info';
                resultDiv.innerHTML = html;
            } catch (error) {
                resultDiv.style.display = 'block';
                resultDiv.className = 'result error';
                resultDiv.innerHTML = `<p>Error: ${error.message}</p>`;
            }
        }
    </script>
</body>
</html>
"#;
