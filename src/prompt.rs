use crate::models::NormalizedRequest;

// Render the instruction sent to the model.
// Pure: the same normalized request always yields the same bytes.
pub fn build_prompt(req: &NormalizedRequest) -> String {
    format!(
        "Eres un creador de guiones profesional especializado en videos virales para redes sociales. \
Genera un guión para un {content_type} en {platform} sobre \"{topic}\". \
Usa un tono {tone}, dirigido a {target_age} años ({target_audience}, {region}), \
con objetivo {content_goal}, duración {script_length} y ~{char_length} caracteres. Incluye:\n\
1. Gancho: Captura la atención al instante.\n\
2. Problema: Describe un problema relevante.\n\
3. Solución: Ofrece una solución atractiva.\n\
4. CTA: Cierra con un llamado persuasivo.\n\
Optimiza para {platform} y adapta a {region}. \
Devuelve solo un objeto JSON, sin texto adicional, con las claves: \
script (gancho, problema, solucion, cta), recommendations (3-5), \
viralityScore (1-10), qualityScore (1-10), reasons (3-5).",
        platform = req.platform,
        content_type = req.content_type,
        topic = req.topic,
        tone = req.tone,
        target_age = req.target_age,
        target_audience = req.target_audience,
        region = req.region,
        content_goal = req.content_goal,
        script_length = req.script_length,
        char_length = req.char_length,
    )
}
